use crate::errors::ApiError;
use crate::models::{CreateRoutineRequest, Notice, RoutineDraft, RoutineForm, ScheduleRequest};
use crate::selection::SelectionStore;
use chrono::NaiveDate;
use std::future::Future;
use tracing::{error, info, warn};

const GENERIC_FAILURE: &str = "No se pudo guardar la rutina.";
const GENERIC_SCHEDULE_FAILURE: &str = "No se pudo asignar la rutina al calendario.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(i64),
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled(String),
    Failed(String),
}

pub trait RoutineApi {
    fn create_routine(
        &self,
        request: &CreateRoutineRequest,
    ) -> impl Future<Output = Result<CreateOutcome, ApiError>> + Send;

    fn schedule_routine(
        &self,
        request: &ScheduleRequest,
    ) -> impl Future<Output = Result<ScheduleOutcome, ApiError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    /// Collecting input; `message` is the inline validation error, if any.
    Open { message: Option<String> },
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmError {
    Invalid(String),
    AlreadySubmitting,
}

#[derive(Debug, Default)]
pub struct SubmissionDialog {
    state: DialogState,
}

impl SubmissionDialog {
    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn open(&mut self, selection: &SelectionStore) -> Result<(), Notice> {
        if selection.is_empty() {
            return Err(Notice::warning(
                "Sin ejercicios",
                "Selecciona ejercicios antes de crear tu rutina.",
            ));
        }
        if self.state != DialogState::Submitting {
            self.state = DialogState::Open { message: None };
        }
        Ok(())
    }

    pub fn confirm(
        &mut self,
        form: &RoutineForm,
        selection: &SelectionStore,
    ) -> Result<RoutineDraft, ConfirmError> {
        if self.state == DialogState::Submitting {
            return Err(ConfirmError::AlreadySubmitting);
        }

        match validate_draft(form, selection) {
            Ok(draft) => {
                self.state = DialogState::Submitting;
                Ok(draft)
            }
            Err(message) => {
                self.state = DialogState::Open {
                    message: Some(message.clone()),
                };
                Err(ConfirmError::Invalid(message))
            }
        }
    }

    pub fn finish(&mut self, outcome: &SubmissionOutcome) {
        self.state = if outcome.routine_created() {
            DialogState::Closed
        } else {
            DialogState::Open { message: None }
        };
    }
}

pub fn validate_draft(form: &RoutineForm, selection: &SelectionStore) -> Result<RoutineDraft, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("El nombre de la rutina es obligatorio.".to_string());
    }
    if selection.is_empty() {
        return Err("Debes seleccionar al menos un ejercicio.".to_string());
    }

    let scheduled_date = match form.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| "Formato de fecha inválido.".to_string())?,
        ),
    };

    let notes = match scheduled_date {
        Some(_) => form.notes.as_deref().unwrap_or_default().trim().to_string(),
        None => String::new(),
    };

    Ok(RoutineDraft {
        name: name.to_string(),
        description: form.description.trim().to_string(),
        scheduled_date,
        notes,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created { routine_id: i64 },
    Scheduled { routine_id: i64, message: String },
    ScheduleFailed { routine_id: i64, message: String },
    Rejected { message: String },
    TransportFailed,
}

impl SubmissionOutcome {
    pub fn routine_created(&self) -> bool {
        self.routine_id().is_some()
    }

    pub fn routine_id(&self) -> Option<i64> {
        match self {
            Self::Created { routine_id }
            | Self::Scheduled { routine_id, .. }
            | Self::ScheduleFailed { routine_id, .. } => Some(*routine_id),
            Self::Rejected { .. } | Self::TransportFailed => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Scheduled { .. } => "scheduled",
            Self::ScheduleFailed { .. } => "schedule_failed",
            Self::Rejected { .. } => "rejected",
            Self::TransportFailed => "transport_failed",
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            Self::Created { .. } => Notice::success(
                "Rutina guardada",
                "Puedes verla en tus rutinas manuales.",
            ),
            Self::Scheduled { message, .. } => Notice::success("Rutina asignada", message.clone()),
            Self::ScheduleFailed { message, .. } => Notice::error("Error", message.clone()),
            Self::Rejected { message } => Notice::error("Error", message.clone()),
            Self::TransportFailed => Notice::error(
                "Error de conexión",
                "No se pudo contactar con el servidor. Inténtalo de nuevo.",
            ),
        }
    }

    /// Clears the selection once the routine exists. Returns whether it changed.
    pub fn apply_to(&self, selection: &mut SelectionStore) -> bool {
        if self.routine_created() && !selection.is_empty() {
            selection.clear();
            true
        } else {
            false
        }
    }
}

pub async fn submit<A: RoutineApi>(
    api: &A,
    draft: &RoutineDraft,
    exercise_ids: Vec<String>,
) -> SubmissionOutcome {
    let request = CreateRoutineRequest {
        name: draft.name.clone(),
        description: draft.description.clone(),
        ejercicios: exercise_ids,
    };

    let routine_id = match api.create_routine(&request).await {
        Ok(CreateOutcome::Created(id)) => id,
        Ok(CreateOutcome::Rejected(message)) => {
            warn!(name = %draft.name, "routine rejected: {message}");
            let message = if message.trim().is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                message
            };
            return SubmissionOutcome::Rejected { message };
        }
        Err(err) => {
            error!(name = %draft.name, "create routine failed: {err}");
            return SubmissionOutcome::TransportFailed;
        }
    };
    info!(routine_id, exercises = request.ejercicios.len(), "routine created");

    let Some(fecha) = draft.scheduled_date else {
        return SubmissionOutcome::Created { routine_id };
    };

    let request = ScheduleRequest {
        fecha,
        rutina_id: routine_id,
        notas: draft.notes.clone(),
        hora: None,
    };

    match api.schedule_routine(&request).await {
        Ok(ScheduleOutcome::Scheduled(message)) => {
            info!(routine_id, %fecha, "routine scheduled");
            SubmissionOutcome::Scheduled { routine_id, message }
        }
        Ok(ScheduleOutcome::Failed(message)) => {
            warn!(routine_id, %fecha, "scheduling rejected: {message}");
            SubmissionOutcome::ScheduleFailed { routine_id, message }
        }
        Err(err) => {
            error!(routine_id, %fecha, "schedule routine failed: {err}");
            SubmissionOutcome::ScheduleFailed {
                routine_id,
                message: GENERIC_SCHEDULE_FAILURE.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseCatalogItem;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        create_reply: Option<CreateOutcome>,
        schedule_reply: Option<ScheduleOutcome>,
        creates: Mutex<Vec<CreateRoutineRequest>>,
        schedules: Mutex<Vec<ScheduleRequest>>,
    }

    impl FakeApi {
        fn replying(create: CreateOutcome, schedule: Option<ScheduleOutcome>) -> Self {
            Self {
                create_reply: Some(create),
                schedule_reply: schedule,
                ..Self::default()
            }
        }
    }

    impl RoutineApi for FakeApi {
        async fn create_routine(&self, request: &CreateRoutineRequest) -> Result<CreateOutcome, ApiError> {
            self.creates.lock().unwrap().push(request.clone());
            self.create_reply
                .clone()
                .ok_or_else(|| ApiError::Decode("connection reset".into()))
        }

        async fn schedule_routine(&self, request: &ScheduleRequest) -> Result<ScheduleOutcome, ApiError> {
            self.schedules.lock().unwrap().push(request.clone());
            self.schedule_reply.clone().ok_or(ApiError::Status(502))
        }
    }

    fn push_up_selection() -> SelectionStore {
        let mut selection = SelectionStore::default();
        selection.toggle(&ExerciseCatalogItem {
            id: "1".into(),
            name: "Push-up".into(),
            description: String::new(),
            category: String::new(),
            level: String::new(),
            muscle: String::new(),
        });
        selection
    }

    fn form(name: &str, date: Option<&str>) -> RoutineForm {
        RoutineForm {
            name: name.into(),
            description: String::new(),
            date: date.map(str::to_string),
            notes: None,
        }
    }

    #[test]
    fn empty_selection_keeps_dialog_closed() {
        let mut dialog = SubmissionDialog::default();
        let notice = dialog.open(&SelectionStore::default()).unwrap_err();
        assert_eq!(notice.title, "Sin ejercicios");
        assert_eq!(dialog.state(), &DialogState::Closed);
    }

    #[test]
    fn blank_name_keeps_dialog_open_with_message() {
        let selection = push_up_selection();
        let mut dialog = SubmissionDialog::default();
        dialog.open(&selection).unwrap();

        let err = dialog.confirm(&form("   ", None), &selection).unwrap_err();
        assert_eq!(err, ConfirmError::Invalid("El nombre de la rutina es obligatorio.".into()));
        assert!(matches!(dialog.state(), DialogState::Open { message: Some(_) }));
    }

    #[test]
    fn confirm_rechecks_the_selection() {
        let mut dialog = SubmissionDialog::default();
        let err = dialog.confirm(&form("Leg Day", None), &SelectionStore::default()).unwrap_err();
        assert_eq!(err, ConfirmError::Invalid("Debes seleccionar al menos un ejercicio.".into()));
    }

    #[test]
    fn bad_date_is_a_validation_error() {
        let err = validate_draft(&form("Leg Day", Some("01/05/2024")), &push_up_selection()).unwrap_err();
        assert_eq!(err, "Formato de fecha inválido.");
    }

    #[test]
    fn notes_without_date_are_dropped() {
        let mut input = form(" Leg Day ", Some(""));
        input.notes = Some("tarde".into());
        let draft = validate_draft(&input, &push_up_selection()).unwrap();
        assert_eq!(draft.name, "Leg Day");
        assert_eq!(draft.scheduled_date, None);
        assert_eq!(draft.notes, "");
    }

    #[test]
    fn second_confirmation_is_refused_while_submitting() {
        let selection = push_up_selection();
        let mut dialog = SubmissionDialog::default();
        dialog.confirm(&form("Leg Day", None), &selection).unwrap();
        assert_eq!(dialog.state(), &DialogState::Submitting);
        assert_eq!(
            dialog.confirm(&form("Leg Day", None), &selection),
            Err(ConfirmError::AlreadySubmitting)
        );
        assert_eq!(dialog.open(&selection), Ok(()));
        assert_eq!(dialog.state(), &DialogState::Submitting);
    }

    #[tokio::test]
    async fn undated_submission_creates_and_clears() {
        let api = FakeApi::replying(CreateOutcome::Created(42), None);
        let mut selection = push_up_selection();
        let mut dialog = SubmissionDialog::default();
        let draft = dialog.confirm(&form("Leg Day", None), &selection).unwrap();

        let outcome = submit(&api, &draft, selection.ids()).await;
        dialog.finish(&outcome);

        assert_eq!(outcome, SubmissionOutcome::Created { routine_id: 42 });
        assert_eq!(
            api.creates.lock().unwrap()[0],
            CreateRoutineRequest {
                name: "Leg Day".into(),
                description: String::new(),
                ejercicios: vec!["1".into()],
            }
        );
        assert!(api.schedules.lock().unwrap().is_empty());
        assert!(outcome.apply_to(&mut selection));
        assert!(selection.is_empty());
        assert_eq!(dialog.state(), &DialogState::Closed);
    }

    #[tokio::test]
    async fn dated_submission_schedules_and_clears_even_on_failure() {
        for reply in [
            Some(ScheduleOutcome::Scheduled("Rutina manual registrada correctamente.".into())),
            Some(ScheduleOutcome::Failed("Fecha y rutina son obligatorias.".into())),
            None,
        ] {
            let api = FakeApi::replying(CreateOutcome::Created(42), reply);
            let mut selection = push_up_selection();
            let draft = validate_draft(&form("Leg Day", Some("2024-05-01")), &selection).unwrap();

            let outcome = submit(&api, &draft, selection.ids()).await;

            assert_eq!(
                api.schedules.lock().unwrap().as_slice(),
                &[ScheduleRequest {
                    fecha: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                    rutina_id: 42,
                    notas: String::new(),
                    hora: None,
                }]
            );
            assert_eq!(outcome.routine_id(), Some(42));
            outcome.apply_to(&mut selection);
            assert!(selection.is_empty());
        }
    }

    #[tokio::test]
    async fn rejected_creation_keeps_selection_and_skips_scheduling() {
        let api = FakeApi::replying(
            CreateOutcome::Rejected("Duplicate name".into()),
            Some(ScheduleOutcome::Scheduled(String::new())),
        );
        let mut selection = push_up_selection();
        let before = selection.clone();
        let mut dialog = SubmissionDialog::default();
        let draft = dialog.confirm(&form("Leg Day", Some("2024-05-01")), &selection).unwrap();

        let outcome = submit(&api, &draft, selection.ids()).await;
        dialog.finish(&outcome);

        assert_eq!(outcome.notice().text, "Duplicate name");
        assert!(!outcome.apply_to(&mut selection));
        assert_eq!(selection, before);
        assert!(api.schedules.lock().unwrap().is_empty());
        assert_eq!(dialog.state(), &DialogState::Open { message: None });
    }

    #[tokio::test]
    async fn rejection_without_text_uses_fallback() {
        let api = FakeApi::replying(CreateOutcome::Rejected(String::new()), None);
        let draft = validate_draft(&form("Leg Day", None), &push_up_selection()).unwrap();
        let outcome = submit(&api, &draft, vec!["1".into()]).await;
        assert_eq!(outcome.notice().text, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn transport_failure_is_generic_and_keeps_selection() {
        let api = FakeApi::default();
        let mut selection = push_up_selection();
        let draft = validate_draft(&form("Leg Day", None), &selection).unwrap();

        let outcome = submit(&api, &draft, selection.ids()).await;

        assert_eq!(outcome, SubmissionOutcome::TransportFailed);
        assert_eq!(outcome.notice().title, "Error de conexión");
        assert!(!outcome.apply_to(&mut selection));
        assert_eq!(selection.len(), 1);
    }
}
