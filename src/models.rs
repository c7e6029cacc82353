use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCatalogItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "descripcion")]
    pub description: String,
    #[serde(default, alias = "tipo", alias = "type")]
    pub category: String,
    #[serde(default, alias = "nivel")]
    pub level: String,
    #[serde(default, alias = "musculo")]
    pub muscle: String,
}

/// Also reads the old `nombre`/`descripcion`/`tipo`/`nivel` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "descripcion")]
    pub description: String,
    #[serde(rename = "type", default, alias = "tipo")]
    pub kind: String,
    #[serde(default, alias = "nivel")]
    pub level: String,
}

impl From<&ExerciseCatalogItem> for SelectionEntry {
    fn from(item: &ExerciseCatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            kind: item.category.clone(),
            level: item.level.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDraft {
    pub name: String,
    pub description: String,
    pub scheduled_date: Option<NaiveDate>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutineForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub id: String,
    #[serde(default)]
    pub back: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRoutineRequest {
    pub name: String,
    pub description: String,
    pub ejercicios: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRoutineResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub rutina_id: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRequest {
    pub fecha: NaiveDate,
    pub rutina_id: i64,
    pub notas: String,
    pub hora: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub count: usize,
    pub entries: Vec<SelectionEntry>,
}

#[derive(Debug, Serialize)]
pub struct CatalogCard {
    #[serde(flatten)]
    pub item: ExerciseCatalogItem,
    pub selected: bool,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub cards: Vec<CatalogCard>,
    pub visible_count: usize,
    pub selected_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: String,
    pub selected: bool,
    pub selection: SelectionView,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rutina_id: Option<i64>,
    pub notice: Notice,
    pub selection: SelectionView,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_selection_keys_are_accepted() {
        let raw = r#"{"id":7,"nombre":"Sentadilla","descripcion":"Piernas","tipo":"Fuerza","nivel":"Intermedio"}"#;
        let entry: SelectionEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, "7");
        assert_eq!(entry.name, "Sentadilla");
        assert_eq!(entry.kind, "Fuerza");
        assert_eq!(entry.level, "Intermedio");
    }

    #[test]
    fn selection_entry_serializes_with_type_key() {
        let entry = SelectionEntry {
            id: "1".into(),
            name: "Push-up".into(),
            description: String::new(),
            kind: "Fuerza".into(),
            level: String::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "Fuerza");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn schedule_request_sends_null_time() {
        let request = ScheduleRequest {
            fecha: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            rutina_id: 42,
            notas: String::new(),
            hora: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"fecha": "2024-05-01", "rutina_id": 42, "notas": "", "hora": null})
        );
    }
}
