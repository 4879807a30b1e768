//! Shapes and normalization rules for the historical JSON training log.
//!
//! The log predates the relational schema: weights hide behind several
//! aliases, set kinds live in free-text notes and intensity is a Portuguese
//! (occasionally English) description instead of a number.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::models::{SetKind, WeightType};

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyWorkout {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "treino")]
    pub name: String,
    pub observacao: Option<String>,
    pub observacoes: Option<String>,
    pub horario_inicio: Option<String>,
    pub horario_fim: Option<String>,
    #[serde(rename = "exercicios", default)]
    pub exercises: Vec<LegacyExercise>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyExercise {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "observacao")]
    pub notes: Option<String>,
    #[serde(default)]
    pub series: LegacySeries,
}

/// Recorded sets, or a planned set count for a template placeholder.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacySeries {
    Count(u32),
    Entries(Vec<LegacySetEntry>),
}

impl Default for LegacySeries {
    fn default() -> Self {
        LegacySeries::Count(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacySetEntry {
    Record(Box<LegacySet>),
    Label(String),
}

/// Either a number or a descriptive string such as `"8-10"` or `"até falha"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegacyValue {
    Number(f64),
    Text(String),
}

impl LegacyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LegacyValue::Number(n) => Some(*n),
            LegacyValue::Text(_) => None,
        }
    }

    /// Integer reading: numbers are rounded, text yields its first integer.
    pub fn as_count(&self) -> Option<i64> {
        match self {
            LegacyValue::Number(n) => Some(n.round() as i64),
            LegacyValue::Text(s) => first_integer(s),
        }
    }

    fn is_present(&self) -> bool {
        match self {
            LegacyValue::Number(n) => *n != 0.0,
            LegacyValue::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for LegacyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyValue::Number(n) => write!(f, "{}", n),
            LegacyValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacySet {
    pub carga: Option<LegacyValue>,
    pub placas_lado_kg: Option<f64>,
    pub halter_kg: Option<f64>,
    pub pino_kg: Option<f64>,
    pub peso_kg: Option<f64>,
    pub peso_extra_kg: Option<f64>,
    pub carga_kg: Option<f64>,
    #[serde(default)]
    pub peso_corporal: bool,
    #[serde(default)]
    pub per_side: bool,
    pub reps: Option<LegacyValue>,
    pub tempo_seg: Option<LegacyValue>,
    #[serde(rename = "RIR", alias = "rir")]
    pub rir: Option<f64>,
    pub intensidade: Option<String>,
    #[serde(default)]
    pub falha_total: bool,
    pub drop_set: Option<LegacyValue>,
    pub rest_pause_reps: Option<LegacyValue>,
    pub observacao: Option<String>,
    pub lado: Option<String>,
    pub pegada: Option<String>,
}

impl LegacySet {
    /// Planned but never performed: `reps: "A DEFINIR"` or `carga: "PULADO"`.
    pub fn is_sentinel(&self) -> bool {
        let marked = |value: &Option<LegacyValue>, marker: &str| {
            matches!(value, Some(LegacyValue::Text(s)) if s == marker)
        };
        marked(&self.reps, "A DEFINIR") || marked(&self.carga, "PULADO")
    }
}

/// First run of ASCII digits in `s`.
pub fn first_integer(s: &str) -> Option<i64> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Picks the weight among the legacy aliases, most specific first.
pub fn detect_weight(set: &LegacySet) -> (Option<f64>, WeightType) {
    if set.peso_corporal {
        return (None, WeightType::Bodyweight);
    }
    if let Some(kg) = set.placas_lado_kg {
        return (Some(kg), WeightType::PerSide);
    }
    if let Some(kg) = set.peso_extra_kg {
        return (Some(kg), WeightType::Extra);
    }

    let total = set
        .halter_kg
        .or(set.pino_kg)
        .or(set.peso_kg)
        .or(set.carga_kg)
        .or_else(|| set.carga.as_ref().and_then(LegacyValue::as_number));

    match total {
        Some(kg) if set.per_side => (Some(kg), WeightType::PerSide),
        weight => (weight, WeightType::Total),
    }
}

fn is_warmup_note(note: &str) -> bool {
    let lower = note.to_lowercase();
    lower.contains("aquecimento") || lower.contains("warmup")
}

/// Any mention of failure counts, "quase falha" included.
fn mentions_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("falha") || lower.contains("failure")
}

pub fn detect_kind(set: &LegacySet) -> SetKind {
    if set.observacao.as_deref().is_some_and(is_warmup_note) {
        return SetKind::Warmup;
    }
    if set.drop_set.as_ref().is_some_and(LegacyValue::is_present) {
        return SetKind::DropSet;
    }
    if set.rest_pause_reps.as_ref().is_some_and(LegacyValue::is_present) {
        return SetKind::RestPause;
    }

    let failure = set.falha_total
        || set.rir == Some(0.0)
        || set.intensidade.as_deref().is_some_and(mentions_failure)
        || set.observacao.as_deref().is_some_and(mentions_failure);
    if failure {
        SetKind::Failure
    } else {
        SetKind::Normal
    }
}

/// Reps in reserve implied by an intensity description. Failure is checked
/// first, then "moderado para leve" before the "moderado" it contains.
pub fn rir_from_intensity(intensity: &str) -> Option<f64> {
    let lower = intensity.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has(&["falha", "failure"]) {
        Some(0.0)
    } else if has(&["pesado", "heavy"]) {
        Some(1.0)
    } else if has(&["moderado para leve", "moderate to light", "moderate-to-light"]) {
        Some(4.0)
    } else if has(&["moderado", "moderate"]) {
        Some(2.0)
    } else if has(&["leve", "light"]) {
        Some(5.0)
    } else {
        None
    }
}

pub fn set_rir(set: &LegacySet) -> Option<f64> {
    set.rir
        .or_else(|| set.intensidade.as_deref().and_then(rir_from_intensity))
}

pub fn set_notes(set: &LegacySet) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(note) = set.observacao.as_deref() {
        if !note.trim().is_empty() && !is_warmup_note(note) {
            parts.push(note.to_string());
        }
    }
    if let Some(drop) = set.drop_set.as_ref().filter(|d| d.is_present()) {
        parts.push(format!("Drop: {}", drop));
    }
    if let Some(reps) = set.rest_pause_reps.as_ref().filter(|r| r.is_present()) {
        parts.push(format!("+{} rest-pause", reps));
    }
    if let Some(side) = &set.lado {
        parts.push(format!("Lado: {}", side));
    }
    if let Some(grip) = &set.pegada {
        parts.push(format!("Pegada: {}", grip));
    }
    if let Some(intensity) = set.intensidade.as_deref().filter(|_| set.rir.is_none()) {
        parts.push(format!("[{}]", intensity));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Start, finish and duration of an imported session. Missing clock times
/// fall back to a one-hour session starting at noon; a finish earlier than
/// the start rolls over to the next day.
pub fn session_times(
    date: NaiveDate,
    start: Option<&str>,
    end: Option<&str>,
) -> (NaiveDateTime, NaiveDateTime, i64) {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    let started_at = date.and_time(start.and_then(parse_clock).unwrap_or(noon));

    let mut finished_at = match end.and_then(parse_clock) {
        Some(time) => date.and_time(time),
        None => started_at + Duration::hours(1),
    };
    if finished_at < started_at {
        finished_at += Duration::days(1);
    }

    let duration = (finished_at - started_at).num_seconds();
    (started_at, finished_at, duration)
}

impl LegacyWorkout {
    pub fn notes(&self) -> Option<String> {
        self.observacao
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.observacoes.clone())
            .filter(|n| !n.is_empty())
    }
}
