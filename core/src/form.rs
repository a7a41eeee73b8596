//! Edit-session state for creating or editing one pet.
//!
//! # Design
//! The form does no field validation of its own; the server is the only
//! judge of what a valid pet is, and its verdict comes back through
//! `save_failed`. The form only guards its own lifecycle: one save at a
//! time, nothing after it closed.

use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{Draft, Kind, Pet, PetId, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Editable, possibly showing errors from a rejected save.
    Idle,
    /// A save request is outstanding.
    Submitting,
    /// The save succeeded; the form accepts no further input.
    Closed,
}

/// What a submit asks the server to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(Draft),
    Update(Pet),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("a save is already in progress")]
    AlreadySaving,
    #[error("the form is closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetForm {
    id: Option<PetId>,
    draft: Draft,
    state: FormState,
    errors: Option<ValidationErrors>,
    failure: Option<String>,
}

impl PetForm {
    /// Empty form for a pet that does not exist yet.
    pub fn new_pet() -> Self {
        Self::with_draft(None, Draft::default())
    }

    /// Form pre-filled from an existing pet. The id is carried into the
    /// update request.
    pub fn edit(pet: &Pet) -> Self {
        Self::with_draft(Some(pet.id), pet.draft())
    }

    fn with_draft(id: Option<PetId>, draft: Draft) -> Self {
        Self {
            id,
            draft,
            state: FormState::Idle,
            errors: None,
            failure: None,
        }
    }

    /// Id of the pet being edited, `None` for a new pet.
    pub fn id(&self) -> Option<PetId> {
        self.id
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_saving(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    /// Message for a failed save that was not a validation rejection.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_kind(&mut self, kind: Option<Kind>) {
        self.draft.kind = kind;
    }

    pub fn set_photo(&mut self, photo: Option<String>) {
        self.draft.photo = photo;
    }

    /// Start a save. Clears the previous attempt's errors.
    pub fn submit(&mut self) -> Result<SaveRequest, FormError> {
        match self.state {
            FormState::Submitting => return Err(FormError::AlreadySaving),
            FormState::Closed => return Err(FormError::Closed),
            FormState::Idle => {}
        }
        self.errors = None;
        self.failure = None;
        self.state = FormState::Submitting;
        let request = match self.id {
            Some(id) => SaveRequest::Update(Pet::with_draft(id, self.draft.clone())),
            None => SaveRequest::Create(self.draft.clone()),
        };
        debug!(id = ?self.id, "form submitted");
        Ok(request)
    }

    pub fn save_succeeded(&mut self) {
        self.state = FormState::Closed;
    }

    /// Return to `Idle`, keeping the draft so the user can fix it and
    /// resubmit.
    pub fn save_failed(&mut self, error: ApiError) {
        self.state = FormState::Idle;
        match error {
            ApiError::Validation(errors) => self.errors = Some(errors),
            other => self.failure = Some(other.to_string()),
        }
    }
}
