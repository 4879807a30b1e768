use chrono::NaiveDateTime;
use rusqlite::{Row, ToSql};
use serde::{Deserialize, Serialize};

use super::{deserialize_some, FromSqliteRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SetKind {
    #[default]
    #[serde(rename = "N")]
    Normal,
    #[serde(rename = "W")]
    Warmup,
    #[serde(rename = "D")]
    DropSet,
    #[serde(rename = "F")]
    Failure,
    #[serde(rename = "R")]
    RestPause,
    #[serde(rename = "S")]
    Superset,
}

impl SetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetKind::Normal => "N",
            SetKind::Warmup => "W",
            SetKind::DropSet => "D",
            SetKind::Failure => "F",
            SetKind::RestPause => "R",
            SetKind::Superset => "S",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "W" => SetKind::Warmup,
            "D" => SetKind::DropSet,
            "F" => SetKind::Failure,
            "R" => SetKind::RestPause,
            "S" => SetKind::Superset,
            _ => SetKind::Normal,
        }
    }
}

/// How a stored weight magnitude translates into the load actually lifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightType {
    #[default]
    Total,
    /// Plates loaded on one side of a barbell; the load is twice the magnitude.
    PerSide,
    /// Added to bodyweight (belt, vest).
    Extra,
    Bodyweight,
}

impl WeightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightType::Total => "total",
            WeightType::PerSide => "per_side",
            WeightType::Extra => "extra",
            WeightType::Bodyweight => "bodyweight",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "per_side" => WeightType::PerSide,
            "extra" => WeightType::Extra,
            "bodyweight" => WeightType::Bodyweight,
            _ => WeightType::Total,
        }
    }
}

/// Load used for every aggregation: per-side magnitudes count twice.
pub fn effective_load(weight: f64, weight_type: WeightType) -> f64 {
    match weight_type {
        WeightType::PerSide => weight * 2.0,
        _ => weight,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: i64,
    pub exercise_id: i64,
    pub order_index: i64,
    pub kind: SetKind,
    pub weight: Option<f64>,
    pub weight_type: WeightType,
    pub reps: Option<i64>,
    pub time_seconds: Option<i64>,
    pub rir: Option<f64>,
    pub rpe: Option<f64>,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl FromSqliteRow for WorkoutSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind: String = row.get("kind")?;
        let weight_type: String = row.get("weight_type")?;
        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            order_index: row.get("order_index")?,
            kind: SetKind::parse(&kind),
            weight: row.get("weight")?,
            weight_type: WeightType::parse(&weight_type),
            reps: row.get("reps")?,
            time_seconds: row.get("time_seconds")?,
            rir: row.get("rir")?,
            rpe: row.get("rpe")?,
            completed: row.get("completed")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSet {
    pub exercise_id: i64,
    pub order_index: i64,
    #[serde(default)]
    pub kind: SetKind,
    #[serde(default)]
    pub weight_type: WeightType,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update of a set. Only the fields present are written; the owning
/// exercise and creation time cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSet {
    pub order_index: Option<i64>,
    pub kind: Option<SetKind>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub weight: Option<Option<f64>>,
    pub weight_type: Option<WeightType>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub reps: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub time_seconds: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rir: Option<Option<f64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rpe: Option<Option<f64>>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
}

impl UpdateSet {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Column/value pairs for the fields present, in a fixed column order.
    pub(crate) fn assignments(&self) -> Vec<(&'static str, Box<dyn ToSql + '_>)> {
        let mut fields: Vec<(&'static str, Box<dyn ToSql + '_>)> = Vec::new();

        if let Some(order_index) = &self.order_index {
            fields.push(("order_index", Box::new(order_index)));
        }
        if let Some(kind) = &self.kind {
            fields.push(("kind", Box::new(kind.as_str())));
        }
        if let Some(weight) = &self.weight {
            fields.push(("weight", Box::new(weight)));
        }
        if let Some(weight_type) = &self.weight_type {
            fields.push(("weight_type", Box::new(weight_type.as_str())));
        }
        if let Some(reps) = &self.reps {
            fields.push(("reps", Box::new(reps)));
        }
        if let Some(time_seconds) = &self.time_seconds {
            fields.push(("time_seconds", Box::new(time_seconds)));
        }
        if let Some(rir) = &self.rir {
            fields.push(("rir", Box::new(rir)));
        }
        if let Some(rpe) = &self.rpe {
            fields.push(("rpe", Box::new(rpe)));
        }
        if let Some(completed) = &self.completed {
            fields.push(("completed", Box::new(completed)));
        }
        if let Some(notes) = &self.notes {
            fields.push(("notes", Box::new(notes)));
        }

        fields
    }
}
