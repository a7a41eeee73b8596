//! Full CRUD lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises `PetApi` and
//! `PetsView` over real HTTP using ureq. Validates that the core's request
//! building and response parsing work end-to-end with the actual server.

use pets_core::{
    ApiError, Completion, Draft, HttpMethod, HttpRequest, HttpResponse, Kind, Pet, PetApi,
    PetClient, PetsView, Transport, TransportError,
};

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
struct Ureq {
    agent: ureq::Agent,
}

impl Ureq {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for Ureq {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => self.agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&req.path).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&req.path).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(&req.path).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn draft(name: &str, kind: Option<Kind>) -> Draft {
    Draft {
        name: name.to_string(),
        kind,
        photo: None,
    }
}

#[test]
fn api_crud_lifecycle() {
    let api = PetApi::new(PetClient::new(&start_server()), Ureq::new());

    // Step 1: list: should be empty.
    assert!(api.list().unwrap().is_empty(), "expected empty list");

    // Step 2: create a pet.
    let created = api.create(&draft("Rex", Some(Kind::Dog))).unwrap();
    assert_eq!(created.name, "Rex");
    assert_eq!(created.kind, Some(Kind::Dog));

    // Step 3: get the created pet.
    assert_eq!(api.get(created.id).unwrap(), created);

    // Step 4: update name, photo.
    let edited = Pet {
        name: "Max".to_string(),
        photo: Some("data:image/png;base64,AAAA".to_string()),
        ..created.clone()
    };
    let updated = api.update(&edited).unwrap();
    assert_eq!(updated, edited);

    // Step 5: rejected create carries both messages.
    let err = api.create(&draft("", None)).unwrap_err();
    let errors = err.validation().expect("validation rejection");
    assert_eq!(errors.name.as_deref(), Some("Name can't be blank"));
    assert_eq!(errors.kind.as_deref(), Some("Kind must be 'cat' or 'dog'"));

    // Step 6: list: should have one item.
    assert_eq!(api.list().unwrap(), vec![updated.clone()]);

    // Step 7: delete.
    api.delete(&updated).unwrap();

    // Step 8: get after delete: should be NotFound.
    assert!(matches!(api.get(updated.id).unwrap_err(), ApiError::NotFound));

    // Step 9: delete again: should be NotFound.
    assert!(matches!(api.delete(&updated).unwrap_err(), ApiError::NotFound));

    // Step 10: list: should be empty again.
    assert!(api.list().unwrap().is_empty(), "expected empty list after delete");
}

#[test]
fn view_session_against_server() {
    let transport = Ureq::new();
    let mut view = PetsView::new(PetClient::new(&start_server()));

    let out = view.mount();
    assert_eq!(view.dispatch(out, &transport), Completion::Loaded { count: 0 });

    // Add two pets through the form.
    for (name, kind) in [("Rex", Kind::Dog), ("Tom", Kind::Cat)] {
        view.open_new();
        let form = view.form_mut().unwrap();
        form.set_name(name);
        form.set_kind(Some(kind));
        let out = view.submit().unwrap();
        assert!(matches!(view.dispatch(out, &transport), Completion::Created(_)));
    }
    assert_eq!(view.pets().len(), 2);
    let rex = view.pets().as_slice()[0].id;
    let tom = view.pets().as_slice()[1].id;

    // A blank save is rejected by the server and the form stays open.
    view.open_edit(rex).unwrap();
    view.form_mut().unwrap().set_name("");
    let out = view.submit().unwrap();
    assert_eq!(view.dispatch(out, &transport), Completion::SaveFailed);
    let form = view.form().unwrap();
    assert!(!form.is_saving());
    assert_eq!(form.errors().unwrap().get("name"), Some("Name can't be blank"));

    // Fix and resubmit.
    view.form_mut().unwrap().set_name("Max");
    let out = view.submit().unwrap();
    assert_eq!(view.dispatch(out, &transport), Completion::Updated(rex));
    assert_eq!(view.pets().get(rex).unwrap().name, "Max");
    assert_eq!(view.pets().as_slice()[0].id, rex);

    // Declined delete sends nothing; confirmed delete removes.
    assert!(view.request_delete(tom, &mut |_: &Pet| false).unwrap().is_none());
    let out = view.request_delete(tom, &mut |_: &Pet| true).unwrap().unwrap();
    assert_eq!(view.dispatch(out, &transport), Completion::Deleted(tom));
    assert_eq!(view.pets().len(), 1);

    // The server agrees with the view.
    let out = view.reload();
    assert_eq!(view.dispatch(out, &transport), Completion::Loaded { count: 1 });
    assert_eq!(view.pets().get(rex).unwrap().name, "Max");
    assert!(view.pets().get(tom).is_none());
}

#[test]
fn unreachable_server_surfaces_load_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut view = PetsView::new(PetClient::new(&format!("http://{addr}")));

    let out = view.mount();
    assert_eq!(view.dispatch(out, &Ureq::new()), Completion::LoadFailed);
    assert!(!view.is_loading());
    assert!(view.error().unwrap().starts_with("Could not load pets"));
}
