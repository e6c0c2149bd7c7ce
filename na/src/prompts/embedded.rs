//! Embedded templates
//!
//! Prompt and document templates compiled into the binary. All user-visible
//! text stays in the flow's natural language.

/// System prompt for plan generation, rendered with a plan context
pub const PLAN_SYSTEM: &str = r#"Você é um nutricionista experiente. Crie um plano alimentar personalizado detalhado e estruturado.

INSTRUÇÕES IMPORTANTES:
- Use linguagem clara e acessível
- Organize o plano de forma estruturada com seções bem definidas
- Inclua horários sugeridos para as refeições
- Considere todas as restrições e preferências informadas
- Forneça alternativas quando possível
- Inclua dicas práticas e motivacionais
- NÃO forneça diagnósticos ou prescrições médicas
- Recomende acompanhamento profissional quando necessário

DADOS DO USUÁRIO:
- Idade: {{age}} anos
- Sexo: {{sex}}
- Altura: {{height}} cm
- Peso: {{weight}} kg
- Nível de atividade: {{activity}}
- Objetivo: {{goal}}
- Refeições por dia: {{meals}}
- Restrições alimentares: {{restrictions}}
- Alergias: {{allergies}}
- Preferências/aversões: {{preferences}}
- Condições médicas: {{conditions}}
- TMB estimada: {{bmr}} kcal
- Gasto calórico diário estimado: {{daily_calories}} kcal

ESTRUTURA DO PLANO:
1. RESUMO NUTRICIONAL
2. PLANO ALIMENTAR DIÁRIO
3. SUGESTÕES DE CARDÁPIO SEMANAL
4. DICAS IMPORTANTES
5. RECOMENDAÇÕES GERAIS"#;

/// User directive sent with the plan system prompt
pub const PLAN_DIRECTIVE: &str = "Crie um plano alimentar completo e personalizado para este usuário, seguindo todas as instruções e considerando todos os dados fornecidos.";

/// System prompt for the general-question path after the flow completes
pub const ASSISTANT_SYSTEM: &str = "Você é um assistente nutricional amigável. Responda de forma útil e educativa, mas sempre recomende consultar profissionais de saúde para questões médicas específicas.";

/// Deterministic fallback plan, rendered with a fallback context.
///
/// Carries the same five sections as the generated plan so downstream
/// consumers see one shape regardless of which path produced the text.
pub const FALLBACK_PLAN: &str = r#"# PLANO ALIMENTAR PERSONALIZADO

## 📊 RESUMO NUTRICIONAL
- **Objetivo**: {{goal}}
- **Refeições diárias**: {{meals}} refeições
- **Nível de atividade**: {{activity}}

## 🍽️ PLANO ALIMENTAR DIÁRIO

### Café da Manhã (7h-8h)
- Fonte de carboidrato: aveia, pães integrais ou frutas
- Proteína: ovos, iogurte grego ou queijo branco
- Gordura saudável: castanhas ou abacate
- Hidratação: água, chá ou café

### Lanche da Manhã (10h-10h30)
- Fruta + oleaginosa
- Ou iogurte com granola caseira

### Almoço (12h-13h)
- Proteína: carnes magras, peixes ou leguminosas
- Carboidrato: arroz integral, batata doce ou quinoa
- Vegetais: salada variada e legumes refogados
- Gordura: azeite de oliva extravirgem

### Lanche da Tarde (15h-16h)
- Opção 1: Vitamina de frutas com leite
- Opção 2: Sanduíche natural integral
- Opção 3: Mix de castanhas e frutas secas

### Jantar (19h-20h)
- Similar ao almoço, mas com porções menores
- Priorizar preparações mais leves
- Incluir sempre vegetais

## 🗓️ SUGESTÕES DE CARDÁPIO SEMANAL
- Alterne as fontes de proteína ao longo da semana (aves, peixes, ovos e leguminosas)
- Varie as cores dos vegetais para cobrir diferentes nutrientes
- Reserve um dia para preparar e congelar refeições da semana
- Experimente uma receita nova por semana para manter a variedade

## 💡 DICAS IMPORTANTES

### Hidratação
- Consuma pelo menos 2-3 litros de água por dia
- Inicie o dia com um copo de água

### Preparação
- Prefira alimentos in natura e minimamente processados
- Planeje as refeições com antecedência
- Tenha sempre lanches saudáveis disponíveis

### Horários
- Mantenha intervalos regulares entre as refeições
- Evite ficar mais de 4 horas sem comer
- Faça a última refeição até 3 horas antes de dormir

## ⚠️ RECOMENDAÇÕES GERAIS
- Este plano é uma orientação geral baseada nas informações fornecidas
- Para um acompanhamento personalizado e adequado, consulte um nutricionista
- Em caso de condições médicas específicas, procure orientação médica
- Ajuste as porções conforme sua fome e saciedade
- Implemente gradualmente as mudanças alimentares e monitore como seu corpo responde
- Mantenha um registro alimentar por algumas semanas

*Lembre-se: uma alimentação saudável é um processo gradual. Seja paciente consigo mesmo!*"#;

/// Exported document body, rendered with a document context
pub const DOCUMENT: &str = r#"PLANO ALIMENTAR PERSONALIZADO
=============================

DADOS PESSOAIS
--------------
Data: {{date}}
{{#if age}}Idade: {{age}} anos
{{/if}}{{#if sex}}Sexo: {{sex}}
{{/if}}{{#if height}}Altura: {{height}} cm
{{/if}}{{#if weight}}Peso: {{weight}} kg
{{/if}}{{#if activity}}Nível de atividade: {{activity}}
{{/if}}{{#if goal}}Objetivo: {{goal}}
{{/if}}{{#if meals}}Refeições por dia: {{meals}}
{{/if}}
{{#if has_restrictions}}RESTRIÇÕES E PREFERÊNCIAS
-------------------------
{{#if restrictions}}Restrições alimentares: {{restrictions}}
{{/if}}{{#if allergies}}Alergias: {{allergies}}
{{/if}}{{#if preferences}}Preferências/aversões: {{preferences}}
{{/if}}{{#if conditions}}Condições médicas: {{conditions}}
{{/if}}
{{/if}}PLANO
-----
{{plan}}

--
Este documento é uma orientação geral e não substitui o acompanhamento de
um nutricionista ou médico.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_system_lists_the_five_sections() {
        assert!(PLAN_SYSTEM.contains("RESUMO NUTRICIONAL"));
        assert!(PLAN_SYSTEM.contains("PLANO ALIMENTAR DIÁRIO"));
        assert!(PLAN_SYSTEM.contains("SUGESTÕES DE CARDÁPIO SEMANAL"));
        assert!(PLAN_SYSTEM.contains("DICAS IMPORTANTES"));
        assert!(PLAN_SYSTEM.contains("RECOMENDAÇÕES GERAIS"));
        assert!(PLAN_SYSTEM.contains("NÃO forneça diagnósticos"));
    }

    #[test]
    fn test_fallback_plan_carries_the_same_sections() {
        assert!(FALLBACK_PLAN.contains("RESUMO NUTRICIONAL"));
        assert!(FALLBACK_PLAN.contains("PLANO ALIMENTAR DIÁRIO"));
        assert!(FALLBACK_PLAN.contains("SUGESTÕES DE CARDÁPIO SEMANAL"));
        assert!(FALLBACK_PLAN.contains("DICAS IMPORTANTES"));
        assert!(FALLBACK_PLAN.contains("RECOMENDAÇÕES GERAIS"));
    }
}
