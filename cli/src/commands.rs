use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Result};
use clap::Args;
use pets_core::{
    Completion, Confirm, Kind, Pet, PetApi, PetClient, PetForm, PetId, PetsView, Transport,
};

use crate::transport::UreqTransport;

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct FieldArgs {
    /// Pet name
    #[arg(long)]
    pub name: Option<String>,

    /// `cat` or `dog`
    #[arg(long)]
    pub kind: Option<Kind>,

    /// Photo as text, e.g. a data URL
    #[arg(long, conflicts_with = "clear_photo")]
    pub photo: Option<String>,

    /// Remove the photo
    #[arg(long)]
    pub clear_photo: bool,
}

impl FieldArgs {
    /// Overwrite only the fields that were given on the command line.
    fn apply(self, form: &mut PetForm) {
        if let Some(name) = self.name {
            form.set_name(name);
        }
        if let Some(kind) = self.kind {
            form.set_kind(Some(kind));
        }
        if let Some(photo) = self.photo {
            form.set_photo(Some(photo));
        } else if self.clear_photo {
            form.set_photo(None);
        }
    }
}

/// Reads a yes/no answer from stdin. Anything but `y`/`yes` declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, pet: &Pet) -> bool {
        print!("Delete {}? [y/N] ", pet.name);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// One line per pet: id, name, kind, and whether it has a photo.
pub fn format_pet(pet: &Pet) -> String {
    let kind = pet.kind.map(|k| k.as_str()).unwrap_or("-");
    let photo = if pet.photo.is_some() { "\tphoto" } else { "" };
    format!("{}\t{}\t{}{}", pet.id, pet.name, kind, photo)
}

/// One command's worth of client state: the view plus the transport that
/// drives it.
pub struct Session<T> {
    client: PetClient,
    view: PetsView,
    transport: T,
}

impl Session<UreqTransport> {
    pub fn connect(base_url: &str) -> Self {
        Self::new(base_url, UreqTransport::new())
    }
}

impl<T: Transport> Session<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        let client = PetClient::new(base_url);
        Self {
            view: PetsView::new(client.clone()),
            client,
            transport,
        }
    }

    fn load(&mut self) -> Result<()> {
        let out = self.view.mount();
        if self.view.dispatch(out, &self.transport) == Completion::LoadFailed {
            bail!(self.view_error());
        }
        Ok(())
    }

    fn view_error(&self) -> String {
        self.view.error().unwrap_or("request failed").to_string()
    }

    pub fn list(&mut self, out: &mut impl Write) -> Result<()> {
        self.load()?;
        for pet in self.view.pets() {
            writeln!(out, "{}", format_pet(pet))?;
        }
        Ok(())
    }

    pub fn show(&self, id: PetId, out: &mut impl Write) -> Result<()> {
        let api = PetApi::new(self.client.clone(), &self.transport);
        let pet = api.get(id)?;
        writeln!(out, "{}", format_pet(&pet))?;
        Ok(())
    }

    pub fn add(&mut self, fields: FieldArgs, out: &mut impl Write) -> Result<()> {
        self.view.open_new();
        self.save(fields, out)
    }

    pub fn edit(&mut self, id: PetId, fields: FieldArgs, out: &mut impl Write) -> Result<()> {
        self.load()?;
        self.view.open_edit(id)?;
        self.save(fields, out)
    }

    fn save(&mut self, fields: FieldArgs, out: &mut impl Write) -> Result<()> {
        let form = self.view.form_mut().ok_or_else(|| anyhow!("no form is open"))?;
        fields.apply(form);
        let request = self.view.submit()?;
        match self.view.dispatch(request, &self.transport) {
            Completion::Created(id) | Completion::Updated(id) => {
                let pet = self
                    .view
                    .pets()
                    .get(id)
                    .ok_or_else(|| anyhow!("pet {id} missing after save"))?;
                writeln!(out, "{}", format_pet(pet))?;
                Ok(())
            }
            _ => {
                let form = self.view.form().ok_or_else(|| anyhow!("pet was not saved"))?;
                if let Some(errors) = form.errors() {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    bail!("pet was not saved");
                }
                bail!(form.failure().unwrap_or("pet was not saved").to_string())
            }
        }
    }

    pub fn remove(&mut self, id: PetId, assume_yes: bool, out: &mut impl Write) -> Result<()> {
        self.load()?;
        let request = if assume_yes {
            self.view.request_delete(id, &mut |_: &Pet| true)?
        } else {
            self.view.request_delete(id, &mut StdinConfirm)?
        };
        let Some(request) = request else {
            writeln!(out, "Cancelled")?;
            return Ok(());
        };
        match self.view.dispatch(request, &self.transport) {
            Completion::Deleted(id) => {
                writeln!(out, "Deleted {id}")?;
                Ok(())
            }
            _ => bail!(self.view_error()),
        }
    }
}
