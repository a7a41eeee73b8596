//! One-call-per-operation wrapper over `PetClient` and a `Transport`.

use tracing::debug;

use crate::client::PetClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Draft, Pet, PetId};

/// Blocking pets API: each method builds a request, hands it to the
/// transport, and parses the response. No retries.
#[derive(Debug, Clone)]
pub struct PetApi<T> {
    client: PetClient,
    transport: T,
}

impl<T: Transport> PetApi<T> {
    pub fn new(client: PetClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PetClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list(&self) -> Result<Vec<Pet>, ApiError> {
        let response = self.send(self.client.build_list_pets())?;
        self.client.parse_list_pets(response)
    }

    pub fn get(&self, id: PetId) -> Result<Pet, ApiError> {
        let response = self.send(self.client.build_get_pet(id))?;
        self.client.parse_get_pet(response)
    }

    pub fn create(&self, draft: &Draft) -> Result<Pet, ApiError> {
        let response = self.send(self.client.build_create_pet(draft)?)?;
        self.client.parse_create_pet(response)
    }

    pub fn update(&self, pet: &Pet) -> Result<Pet, ApiError> {
        let response = self.send(self.client.build_update_pet(pet)?)?;
        self.client.parse_update_pet(response)
    }

    pub fn delete(&self, pet: &Pet) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_pet(pet.id))?;
        self.client.parse_delete_pet(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
