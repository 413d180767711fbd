use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const EXCERPT_CHARS: usize = 150;

/// A blog post. `id` is assigned by the backend on create and immutable
/// afterwards; `content` is free text and the excerpt is always derived from
/// it, never stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl BlogPost {
    /// First ~150 characters of the content, cut on a char boundary.
    pub fn excerpt(&self) -> String {
        let trimmed = self.content.trim();
        match trimmed.char_indices().nth(EXCERPT_CHARS) {
            None => trimmed.to_string(),
            Some((byte_index, _)) => format!("{}...", trimmed[..byte_index].trim_end()),
        }
    }

    /// URL slug for the public "read article" route.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

/// Derive a URL slug from a title: lowercase, fold diacritics, keep only
/// alphanumerics, spaces and hyphens, collapse whitespace and hyphen runs,
/// trim hyphens. Deterministic, so client and server agree on the same slug
/// for the same title.
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let hyphenated = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

    let mut slug = String::with_capacity(hyphenated.len());
    let mut previous_hyphen = false;
    for c in hyphenated.chars() {
        if c == '-' {
            if !previous_hyphen {
                slug.push('-');
            }
            previous_hyphen = true;
        } else {
            slug.push(c);
            previous_hyphen = false;
        }
    }
    slug.trim_matches('-').to_string()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        _ => c,
    }
}

/// Fixed sample posts served when the first load has no connectivity and the
/// cache is empty, so the blog page is never blank.
pub(crate) fn placeholder_posts() -> Vec<BlogPost> {
    let published = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).single().unwrap_or_else(Utc::now);
    vec![
        BlogPost {
            id: 1,
            title: "Como cuidar da saude do seu coracao".to_string(),
            content: "Pequenas mudancas de habito reduzem de forma significativa o risco \
                      cardiovascular: atividade fisica regular, alimentacao equilibrada e \
                      acompanhamento medico periodico."
                .to_string(),
            created_at: published,
        },
        BlogPost {
            id: 2,
            title: "Quando procurar um cardiologista".to_string(),
            content: "Dor no peito, falta de ar e palpitacoes merecem avaliacao. Mas a \
                      consulta preventiva e indicada mesmo sem sintomas, principalmente \
                      com historico familiar."
                .to_string(),
            created_at: published,
        },
        BlogPost {
            id: 3,
            title: "O que esperar do check-up cardiologico".to_string(),
            content: "O check-up combina avaliacao clinica, eletrocardiograma e exames \
                      laboratoriais para mapear fatores de risco e orientar o tratamento."
                .to_string(),
            created_at: published,
        },
    ]
}
