//! Conversation flow
//!
//! The fixed linear intake sequence: per-step question and reprompt texts,
//! the consent and medical-request classifiers, and the engine that drives
//! a session through the steps. Each step has exactly one question and one
//! reprompt, so the one-handler-per-step invariant stays visible here.

mod engine;

pub use engine::{Engine, MessageResponse};

use regex::Regex;
use sessionstore::Step;
use std::sync::LazyLock;

/// Sentinel appended to the final reply to signal "plan ready to export"
pub const EXPORT_SENTINEL: &str = "##EXPORT_PDF";

/// Fixed apology returned when message processing fails internally
pub const INTERNAL_ERROR_TEXT: &str = "Desculpe, ocorreu um erro interno. Tente novamente mais tarde.";

/// Fixed reply when the general-question path cannot produce an answer
pub(crate) const GENERAL_FAILURE_TEXT: &str =
    "Desculpe, não consegui processar sua mensagem. Pode reformular sua pergunta?";

/// Fixed disclaimer for medical requests; no model call is made
pub(crate) const MEDICAL_DISCLAIMER: &str = "Importante: Não posso fornecer diagnósticos ou prescrições médicas. Para questões de saúde específicas, recomendo consultar um profissional de saúde qualificado. Posso ajudar com orientações gerais sobre alimentação saudável.";

/// Lead-in for the final reply carrying the generated plan
pub(crate) const COMPLETION_PREFIX: &str =
    "Perfeito! Coletei todas as informações necessárias. Aqui está seu plano alimentar personalizado:";

static AFFIRMATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sim|yes|ok|pode|claro|vamos|aceito").expect("affirmative regex"));

/// Keywords that flag a message as a medical request
const MEDICAL_KEYWORDS: [&str; 11] = [
    "diagnóstico",
    "diagnostico",
    "remédio",
    "medicamento",
    "receita",
    "prescrição",
    "doença",
    "sintoma",
    "tratamento",
    "cura",
    "medicina",
];

/// Whether the text reads as consent to start the intake
pub(crate) fn is_affirmative(text: &str) -> bool {
    AFFIRMATIVE.is_match(text)
}

/// Whether the text asks for diagnosis/medication/treatment
pub(crate) fn contains_medical_request(text: &str) -> bool {
    let normalized = text.to_lowercase();
    MEDICAL_KEYWORDS.iter().any(|keyword| normalized.contains(keyword))
}

/// Question asked when the flow enters `step`. Complete has no question.
pub(crate) fn question(step: Step) -> &'static str {
    match step {
        Step::Permission => "Posso fazer algumas perguntas para criar seu plano alimentar personalizado?",
        Step::Age => "Perfeito! Vamos começar. Qual é a sua idade?",
        Step::Sex => "Obrigado! Qual é o seu sexo/gênero? (masculino, feminino ou outro)",
        Step::Height => "Perfeito! Qual é a sua altura em centímetros?",
        Step::Weight => "Ótimo! E qual é o seu peso atual em quilogramas?",
        Step::ActivityLevel => {
            "Entendi! Como você classificaria seu nível de atividade física?\n\n• Sedentário (pouco ou nenhum exercício)\n• Leve (exercício leve 1-3 dias por semana)\n• Moderado (exercício moderado 3-5 dias por semana)\n• Intenso (exercício pesado 6-7 dias por semana)"
        }
        Step::Goal => {
            "Perfeito! Qual é o seu objetivo principal? (ex: emagrecimento, ganho de massa muscular, manutenção do peso, controle de glicemia, etc.)"
        }
        Step::MealsPerDay => "Excelente! Quantas refeições você costuma fazer por dia?",
        Step::DietaryRestrictions => {
            "Ótimo! Você tem alguma restrição alimentar? (ex: vegetariano, vegano, halal, kosher, sem glúten, etc.) Se não tiver, pode responder \"nenhuma\"."
        }
        Step::Allergies => {
            "Entendi! Você tem alguma alergia ou intolerância alimentar? (ex: lactose, amendoim, frutos do mar, etc.) Se não tiver, pode responder \"nenhuma\"."
        }
        Step::Preferences => {
            "Perfeito! Há algum alimento que você não gosta ou tem preferência em evitar? Se não houver, pode responder \"nenhuma\"."
        }
        Step::MedicalConditions => {
            "Última pergunta! Você tem alguma condição médica relevante que devo considerar? (ex: diabetes, hipertensão, etc.) Se não tiver, pode responder \"nenhuma\"."
        }
        Step::Complete => "",
    }
}

/// Reprompt returned when a step's answer does not validate; steps whose
/// extraction cannot fail re-ask their own question.
pub(crate) fn reprompt(step: Step) -> &'static str {
    match step {
        Step::Permission => {
            "Tudo bem! Quando quiser criar seu plano alimentar personalizado, é só me avisar. Posso fazer algumas perguntas para criar seu plano alimentar personalizado?"
        }
        Step::Age => "Por favor, me informe uma idade válida entre 1 e 120 anos.",
        Step::Sex => "Por favor, informe: masculino, feminino ou outro.",
        Step::Height => "Por favor, informe uma altura válida entre 50 e 300 cm.",
        Step::Weight => "Por favor, informe um peso válido entre 20 e 500 kg.",
        Step::ActivityLevel => "Por favor, escolha uma opção: sedentário, leve, moderado ou intenso.",
        Step::MealsPerDay => "Por favor, informe um número válido de refeições entre 1 e 10.",
        other => question(other),
    }
}
