use super::types::ContentDocument;
use once_cell::sync::Lazy;
use serde_json::json;

/// The built-in content document, used to fill gaps in whatever the
/// fallback chain yields and served whole when every tier is empty.
/// Icons are stored as identifier strings; the presentation layer resolves
/// them to renderable components.
pub static DEFAULT_CONTENT: Lazy<ContentDocument> = Lazy::new(|| {
    serde_json::from_value(json!({
        "hero": {
            "title": "Dr. Rodrigo Sguario",
            "subtitle": "Cardiologia Clinica e Preventiva",
            "description": "Cuidado cardiovascular completo, do diagnostico ao acompanhamento, com atendimento humanizado.",
            "cta_text": "Agende sua consulta",
            "stats": [
                { "value": "15+", "label": "Anos de experiencia" },
                { "value": "5000+", "label": "Pacientes atendidos" },
                { "value": "4.9", "label": "Avaliacao media" }
            ]
        },
        "about": {
            "title": "Sobre o Dr. Rodrigo",
            "description": "Cardiologista com atuacao em prevencao, diagnostico e tratamento de doencas cardiovasculares.",
            "achievements": [
                "Titulo de especialista em Cardiologia",
                "Membro da Sociedade Brasileira de Cardiologia",
                "Referencia em check-up cardiologico preventivo"
            ],
            "education": [
                { "year": "2008", "title": "Graduacao em Medicina", "institution": "Universidade de Sao Paulo" },
                { "year": "2011", "title": "Residencia em Clinica Medica", "institution": "Hospital das Clinicas" },
                { "year": "2014", "title": "Especializacao em Cardiologia", "institution": "InCor" }
            ],
            "values": [
                { "icon": "heart", "title": "Atendimento humanizado", "description": "Cada paciente e acompanhado de perto, sem pressa." },
                { "icon": "shield", "title": "Prevencao em primeiro lugar", "description": "Foco em evitar a doenca antes de trata-la." },
                { "icon": "star", "title": "Atualizacao constante", "description": "Conduta baseada nas diretrizes mais recentes." }
            ]
        },
        "services": {
            "title": "Especialidades",
            "subtitle": "Atendimento completo em cardiologia",
            "specialties": [
                { "icon": "stethoscope", "title": "Consulta cardiologica", "description": "Avaliacao clinica completa com eletrocardiograma." },
                { "icon": "activity", "title": "Check-up preventivo", "description": "Rastreio de fatores de risco cardiovascular." },
                { "icon": "monitor", "title": "MAPA e Holter", "description": "Monitorizacao ambulatorial de pressao e ritmo." },
                { "icon": "heart-pulse", "title": "Ergometria", "description": "Teste de esforco para avaliacao funcional." }
            ],
            "features": [
                "Agendamento online",
                "Retorno incluso",
                "Laudos digitais"
            ]
        },
        "contact": {
            "title": "Entre em contato",
            "phone": "(11) 3456-7890",
            "whatsapp": "+55 11 99999-0000",
            "email": "contato@drrodrigosguario.com.br",
            "address": "Av. Paulista, 1000 - Sala 1203, Sao Paulo - SP",
            "hours": "Segunda a sexta, 8h as 18h"
        },
        "reviews": {
            "title": "Depoimentos",
            "subtitle": "O que os pacientes dizem",
            "items": []
        }
    }))
    .expect("default content document is well-formed")
});
