//! # User Messages
//!
//! Italian sentences shown next to each result. The numbers come from the
//! core; this module only picks the wording from the assessment tiers.

use chemediaho_core::{Direction, Effort, Goal, GradeScope, Prediction, SuggestionSet};

/// "un voto" / "3 voti".
fn grade_text(count: usize) -> String {
    if count == 1 {
        "un voto".to_string()
    } else {
        format!("{} voti", count)
    }
}

/// Round to two decimals for display (7.666 -> 7.67, 7.0 -> 7).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Upper-case the first letter.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Phrase naming where a target applies.
fn scope_text(scope: Option<&GradeScope>) -> String {
    match scope {
        Some(GradeScope::Overall) => "di media generale".to_string(),
        Some(GradeScope::Period { period }) => format!("nel periodo {}", period),
        Some(GradeScope::Subject { subject, .. }) => format!("in {}", subject),
        None => "di media".to_string(),
    }
}

/// Message for a planned goal.
#[must_use]
pub fn goal_message(goal: &Goal) -> String {
    let target = goal.target_average;
    let grades = grade_text(goal.grade_count);

    if let (true, Some(avg)) = (goal.already_met, goal.current_average) {
        return format!(
            "🎉 Obiettivo già raggiunto! La tua media attuale ({}) è già pari o superiore all'obiettivo di {}.",
            round2(avg),
            target
        );
    }

    let display = goal.display_grade;
    match Effort::of(goal.required_grade) {
        Effort::Achieved => format!(
            "Ottimo! La tua media attuale è già sopra l'obiettivo. Anche con voti minimi raggiungerai {}.",
            target
        ),
        Effort::Infeasible => format!(
            "Purtroppo non è possibile raggiungere {} con {}. Prova a impostare un obiettivo più realistico o aggiungere più voti!",
            target, grades
        ),
        Effort::Maximum => format!(
            "Ci vuole impegno! Ti serve {} da 10 (arrotondato da {}) per raggiungere l'obiettivo.",
            grades,
            round2(goal.required_grade)
        ),
        Effort::Demanding => format!(
            "Devi impegnarti molto: ti serve {} da almeno {} per raggiungere l'obiettivo.",
            grades, display
        ),
        Effort::Feasible => format!(
            "È fattibile: con {} da {} puoi raggiungere {}.",
            grades, display, target
        ),
        Effort::AlmostThere => format!(
            "Ci sei quasi! {} da {} ti permetterà di raggiungere l'obiettivo.",
            capitalize(&grades),
            display
        ),
        Effort::Modest => format!(
            "Ottimo! Anche con {} modesti ({}) raggiungerai {}.",
            grades, display, target
        ),
    }
}

/// Message for a prediction.
#[must_use]
pub fn prediction_message(prediction: &Prediction) -> String {
    let grades = grade_text(prediction.added);
    let predicted = round2(prediction.predicted_average);
    let change = prediction.change;

    match Direction::of(change) {
        Direction::SharpRise => format!(
            "Ottimo! Con {} la tua media salirebbe a {} ({:+.2})! 📈",
            grades, predicted, change
        ),
        Direction::Rise => format!(
            "Bene! Con {} la tua media migliorerebbe leggermente a {} ({:+.2}). ✅",
            grades, predicted, change
        ),
        Direction::Stable => format!(
            "Con {} la tua media rimarrebbe stabile a {}. ➡️",
            grades, predicted
        ),
        Direction::Dip => format!(
            "Attenzione! Con {} la tua media scenderebbe leggermente a {} ({:.2}). ⚠️",
            grades, predicted, change
        ),
        Direction::SharpDrop => format!(
            "Attenzione! Con {} la tua media scenderebbe significativamente a {} ({:.2}). 📉",
            grades, predicted, change
        ),
    }
}

/// Message for a suggestion set; `scope` is `None` for plain subject lists.
#[must_use]
pub fn suggestion_message(set: &SuggestionSet, scope: Option<&GradeScope>) -> String {
    if set.suggestions.is_empty() {
        return "Nessuna materia disponibile per il calcolo.".to_string();
    }
    let target = set.target_average;
    let grades = grade_text(set.grade_count);
    let place = scope_text(scope);

    let Some(first) = set.best() else {
        return format!(
            "⚠️ Raggiungere {} {} è molto difficile. Serve impegno in tutte le materie!",
            target, place
        );
    };

    let effort = Effort::of(first.required_grade);
    if effort >= Effort::Demanding {
        format!(
            "💪 Concentrati su {}! Servono {} da {} per raggiungere {} {}.",
            first.subject, grades, first.display_grade, target, place
        )
    } else if effort >= Effort::Feasible {
        format!(
            "✅ Obiettivo raggiungibile! Parti da {}, la materia dove ti serve di meno.",
            first.subject
        )
    } else {
        format!(
            "🎉 Ottimo! Anche con {} modesti puoi raggiungere {} {}!",
            grades, target, place
        )
    }
}
