//! Top-level coordinator for the pets screen.
//!
//! # Design
//! `PetsView` is the single owner of the store, the loading flag, the
//! user-visible error and the open modal. It never performs I/O: operations
//! that need the server return an `Outgoing` (a request plus a `Ticket`), and
//! the host feeds the outcome back through `complete`. Responses are matched
//! to what is still in flight by ticket, so a response for a modal that was
//! closed, a list load that was superseded, or a view that was unmounted is
//! dropped instead of being applied to state it no longer belongs to.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::PetClient;
use crate::error::ApiError;
use crate::form::{FormError, PetForm, SaveRequest};
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::store::PetStore;
use crate::types::{Pet, PetId};

/// Handle pairing an issued request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A request the host must execute and report back via `PetsView::complete`.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    None,
    New(PetForm),
    Edit(PetForm),
}

/// What applying a response did to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded { count: usize },
    LoadFailed,
    Created(PetId),
    Updated(PetId),
    /// The form stays open showing the error.
    SaveFailed,
    Deleted(PetId),
    DeleteFailed(PetId),
    /// The request had been abandoned; nothing changed.
    Discarded,
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("no form is open")]
    NoModal,
    #[error("pet {0} is not in the list")]
    UnknownPet(PetId),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Asks the user to confirm deleting a pet.
pub trait Confirm {
    fn confirm(&mut self, pet: &Pet) -> bool;
}

impl<F: FnMut(&Pet) -> bool> Confirm for F {
    fn confirm(&mut self, pet: &Pet) -> bool {
        self(pet)
    }
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Load,
    Create,
    Update,
    Delete(PetId),
}

#[derive(Debug)]
pub struct PetsView {
    client: PetClient,
    store: PetStore,
    loading: bool,
    error: Option<String>,
    modal: Modal,
    in_flight: HashMap<Ticket, Pending>,
    next_ticket: u64,
}

impl PetsView {
    pub fn new(client: PetClient) -> Self {
        Self {
            client,
            store: PetStore::new(),
            loading: false,
            error: None,
            modal: Modal::None,
            in_flight: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn pets(&self) -> &PetStore {
        &self.store
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last failure the user has not dismissed yet.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn form(&self) -> Option<&PetForm> {
        match &self.modal {
            Modal::New(form) | Modal::Edit(form) => Some(form),
            Modal::None => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut PetForm> {
        match &mut self.modal {
            Modal::New(form) | Modal::Edit(form) => Some(form),
            Modal::None => None,
        }
    }

    /// Start loading the list.
    pub fn mount(&mut self) -> Outgoing {
        self.reload()
    }

    /// Load the list again. A list request still in flight is abandoned.
    pub fn reload(&mut self) -> Outgoing {
        self.in_flight.retain(|_, pending| !matches!(pending, Pending::Load));
        self.loading = true;
        self.issue(Pending::Load, self.client.build_list_pets())
    }

    /// Drop every request in flight and close any open form.
    pub fn unmount(&mut self) {
        if !self.in_flight.is_empty() {
            debug!(count = self.in_flight.len(), "abandoning in-flight requests");
        }
        self.in_flight.clear();
        self.loading = false;
        self.modal = Modal::None;
    }

    pub fn open_new(&mut self) {
        self.close_modal();
        self.modal = Modal::New(PetForm::new_pet());
    }

    pub fn open_edit(&mut self, id: PetId) -> Result<(), ViewError> {
        let pet = self.store.get(id).ok_or(ViewError::UnknownPet(id))?;
        let form = PetForm::edit(pet);
        self.close_modal();
        self.modal = Modal::Edit(form);
        Ok(())
    }

    /// Close the open form. A save it has in flight is abandoned.
    pub fn close_modal(&mut self) {
        self.in_flight
            .retain(|_, pending| !matches!(pending, Pending::Create | Pending::Update));
        self.modal = Modal::None;
    }

    /// Submit the open form.
    pub fn submit(&mut self) -> Result<Outgoing, ViewError> {
        let form = match &mut self.modal {
            Modal::New(form) | Modal::Edit(form) => form,
            Modal::None => return Err(ViewError::NoModal),
        };
        let (pending, built) = match form.submit()? {
            SaveRequest::Create(draft) => (Pending::Create, self.client.build_create_pet(&draft)),
            SaveRequest::Update(pet) => (Pending::Update, self.client.build_update_pet(&pet)),
        };
        match built {
            Ok(request) => Ok(self.issue(pending, request)),
            Err(err) => {
                warn!(error = %err, "could not build save request");
                form.save_failed(err.clone());
                Err(err.into())
            }
        }
    }

    /// Ask for confirmation, then request deletion of pet `id`.
    ///
    /// Returns `Ok(None)` when the user declines or a delete of this pet is
    /// already in flight; nothing is sent and the list is left as it is.
    pub fn request_delete(
        &mut self,
        id: PetId,
        confirm: &mut impl Confirm,
    ) -> Result<Option<Outgoing>, ViewError> {
        let pet = self.store.get(id).ok_or(ViewError::UnknownPet(id))?;
        if self.is_deleting(id) {
            debug!(%id, "delete already in flight");
            return Ok(None);
        }
        if !confirm.confirm(pet) {
            debug!(%id, "delete declined");
            return Ok(None);
        }
        let request = self.client.build_delete_pet(id);
        Ok(Some(self.issue(Pending::Delete(id), request)))
    }

    /// Whether a delete of pet `id` has been sent and not completed yet.
    pub fn is_deleting(&self, id: PetId) -> bool {
        self.in_flight
            .values()
            .any(|pending| matches!(pending, Pending::Delete(pending_id) if *pending_id == id))
    }

    /// Execute `outgoing` on `transport` and apply the result.
    pub fn dispatch<T: Transport>(&mut self, outgoing: Outgoing, transport: &T) -> Completion {
        let Outgoing { ticket, request } = outgoing;
        let result = transport.execute(request);
        self.complete(ticket, result)
    }

    /// Apply the outcome of a request issued by this view.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<HttpResponse, TransportError>,
    ) -> Completion {
        let Some(pending) = self.in_flight.remove(&ticket) else {
            debug!(?ticket, "discarding response for abandoned request");
            return Completion::Discarded;
        };
        let result = result.map_err(ApiError::from);
        match pending {
            Pending::Load => {
                let parsed = result.and_then(|r| self.client.parse_list_pets(r));
                self.finish_load(parsed)
            }
            Pending::Create => {
                let parsed = result.and_then(|r| self.client.parse_create_pet(r));
                self.finish_save(parsed, false)
            }
            Pending::Update => {
                let parsed = result.and_then(|r| self.client.parse_update_pet(r));
                self.finish_save(parsed, true)
            }
            Pending::Delete(id) => {
                let parsed = result.and_then(|r| self.client.parse_delete_pet(r));
                self.finish_delete(id, parsed)
            }
        }
    }

    fn issue(&mut self, pending: Pending, request: HttpRequest) -> Outgoing {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(ticket, pending);
        debug!(?ticket, ?pending, method = %request.method, path = %request.path, "request issued");
        Outgoing { ticket, request }
    }

    fn finish_load(&mut self, result: Result<Vec<Pet>, ApiError>) -> Completion {
        self.loading = false;
        match result {
            Ok(pets) => {
                self.store.replace_all(pets);
                self.error = None;
                Completion::Loaded {
                    count: self.store.len(),
                }
            }
            Err(err) => {
                warn!(error = %err, "loading pets failed");
                self.error = Some(format!("Could not load pets: {err}"));
                Completion::LoadFailed
            }
        }
    }

    fn finish_save(&mut self, result: Result<Pet, ApiError>, update: bool) -> Completion {
        match result {
            Ok(pet) => {
                let id = pet.id;
                if !update {
                    self.store.append(pet);
                } else if !self.store.replace_by_id(pet) {
                    // Deleted while the save was in flight.
                    debug!(%id, "updated pet is no longer listed, store left as is");
                }
                if let Some(form) = self.form_mut() {
                    form.save_succeeded();
                }
                self.modal = Modal::None;
                if update {
                    Completion::Updated(id)
                } else {
                    Completion::Created(id)
                }
            }
            Err(err) => {
                warn!(error = %err, "saving pet failed");
                if let Some(form) = self.form_mut() {
                    form.save_failed(err);
                }
                Completion::SaveFailed
            }
        }
    }

    fn finish_delete(&mut self, id: PetId, result: Result<(), ApiError>) -> Completion {
        match result {
            Ok(()) => {
                self.store.remove_by_id(id);
                Completion::Deleted(id)
            }
            Err(err) => {
                warn!(%id, error = %err, "deleting pet failed");
                let name = self
                    .store
                    .get(id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("pet {id}"));
                self.error = Some(format!("Could not delete {name}: {err}"));
                Completion::DeleteFailed(id)
            }
        }
    }
}
