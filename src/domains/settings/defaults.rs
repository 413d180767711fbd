use super::types::SettingsDocument;
use once_cell::sync::Lazy;
use serde_json::json;

/// Built-in settings document. Color themes live under `site` as named
/// records plus an active theme id; the presentation layer resolves the id.
pub static DEFAULT_SETTINGS: Lazy<SettingsDocument> = Lazy::new(|| {
    serde_json::from_value(json!({
        "doctor": {
            "name": "Dr. Rodrigo Sguario",
            "specialty": "Cardiologia",
            "crm": "CRM-SP 123456",
            "email": "contato@drrodrigosguario.com.br"
        },
        "clinic": {
            "name": "Clinica Sguario",
            "address": "Av. Paulista, 1000 - Sala 1203, Sao Paulo - SP",
            "phone": "+551134567890",
            "email": "recepcao@drrodrigosguario.com.br",
            "hours": "Segunda a sexta, 8h as 18h"
        },
        "social": {
            "instagram": "https://instagram.com/drrodrigosguario",
            "facebook": "https://facebook.com/drrodrigosguario",
            "linkedin": "",
            "youtube": ""
        },
        "site": {
            "title": "Dr. Rodrigo Sguario - Cardiologista",
            "description": "Cardiologia clinica e preventiva em Sao Paulo.",
            "active_theme": "classic",
            "themes": {
                "classic": { "primary": "#1d4ed8", "secondary": "#0f172a", "accent": "#38bdf8" },
                "warm": { "primary": "#b45309", "secondary": "#451a03", "accent": "#fbbf24" }
            }
        },
        "whatsapp": {
            "phone_number": "+5511999990000",
            "welcome_message": "Ola! Gostaria de agendar uma consulta?",
            "widget_enabled": true,
            "widget_position": "bottom-right",
            "widget_color": "#25D366"
        }
    }))
    .expect("default settings document is well-formed")
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::settings::types::CATEGORIES;

    #[test]
    fn defaults_cover_every_category() {
        for category in CATEGORIES {
            assert!(DEFAULT_SETTINGS.contains(category), "missing {}", category);
        }
    }
}
