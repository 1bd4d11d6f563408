//! Main menu and the five record operations.
//!
//! Each operation opens its own storage session, and any error it raises is
//! reported to the operator before returning to the main menu. The only error
//! that escapes [`App::run`] is a closed console.

use crate::builder::{apply_field, build, AttributeSet};
use crate::catalog::{Catalog, EntityDescriptor};
use crate::console::Console;
use crate::entity::Record;
use crate::error::DbmsError;
use crate::import::{import_batch, parse, read_import_file};
use crate::pagination::{paginate, PageAction};
use crate::projector::project_all;
use crate::session::{SessionFactory, StorageSession};
use crate::value::coerce;

pub const RETURN_OPTION: &str = "Return";
const ACCEPT_OPTION: &str = "Yes";
const DENY_OPTION: &str = "No";

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Create,
    Read,
    Update,
    Delete,
    ImportFromFile,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::Create,
        MenuAction::Read,
        MenuAction::Update,
        MenuAction::Delete,
        MenuAction::ImportFromFile,
        MenuAction::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Create => "Create new entry for a table",
            MenuAction::Read => "Read entries of a table",
            MenuAction::Update => "Update entry of a table",
            MenuAction::Delete => "Delete entry from a table",
            MenuAction::ImportFromFile => "Insert data from file",
            MenuAction::Exit => "Exit",
        }
    }

    /// Whether the operator confirms with `Return` before the menu redisplays
    fn needs_acknowledgement(&self) -> bool {
        !matches!(self, MenuAction::Read | MenuAction::Exit)
    }
}

/// How an operation ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The operator picked `Return` before anything happened
    Back,
}

/// The interactive console application
pub struct App<'a> {
    catalog: &'a Catalog,
    stores: &'a dyn SessionFactory,
    page_size: usize,
}

impl<'a> App<'a> {
    pub fn new(catalog: &'a Catalog, stores: &'a dyn SessionFactory, page_size: usize) -> Self {
        Self {
            catalog,
            stores,
            page_size,
        }
    }

    /// Show the main menu until the operator picks Exit.
    pub fn run(&self, console: &mut dyn Console) -> Result<(), DbmsError> {
        let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();

        loop {
            console.message("Welcome to the DBMS");
            let action = MenuAction::ALL[console.prompt_selection(&labels)?];

            if action == MenuAction::Exit {
                tracing::info!("Operator exited");
                return Ok(());
            }
            self.perform(action, console)?;
        }
    }

    /// Run one menu action and report its failure, if any.
    pub fn perform(&self, action: MenuAction, console: &mut dyn Console) -> Result<(), DbmsError> {
        tracing::debug!(?action, "Starting menu action");

        let result = match action {
            MenuAction::Create => self.create_entry(console),
            MenuAction::Read => self.read_table(console),
            MenuAction::Update => self.update_entry(console),
            MenuAction::Delete => self.delete_entry(console),
            MenuAction::ImportFromFile => self.import_from_file(console),
            MenuAction::Exit => Ok(Outcome::Back),
        };

        let acknowledge = match result {
            Ok(Outcome::Back) => false,
            Ok(Outcome::Completed) => action.needs_acknowledgement(),
            Err(err) if err.is_console_closed() => return Err(err),
            Err(err) => {
                tracing::warn!(?action, error = %err, "Menu action failed");
                console.message(&err.to_string());
                action.needs_acknowledgement()
            }
        };

        if acknowledge {
            console.prompt_selection(&[RETURN_OPTION])?;
        }
        Ok(())
    }

    /// Ask for a table; `None` when the operator picks Return.
    fn select_table(
        &self,
        console: &mut dyn Console,
    ) -> Result<Option<&'static EntityDescriptor>, DbmsError> {
        console.message("Please select a table:");

        let mut options = self.catalog.list_tables();
        options.push(RETURN_OPTION);

        let choice = console.prompt_selection(&options)?;
        if choice + 1 == options.len() {
            return Ok(None);
        }

        let descriptor = self.catalog.describe(options[choice])?;
        console.message(&format!("You selected the table: {}", descriptor.table_name));
        Ok(Some(descriptor))
    }

    /// Ask for one record of `descriptor`; `None` when the operator picks Return.
    ///
    /// Line N of the list is built from record N of the same enumeration, so
    /// the chosen index always addresses the row that was displayed.
    fn select_record(
        &self,
        session: &mut (dyn StorageSession + '_),
        descriptor: &EntityDescriptor,
        console: &mut dyn Console,
    ) -> Result<Option<Record>, DbmsError> {
        let records = session.get(descriptor.table_name)?;
        let lines = project_all(&records, descriptor);

        let mut options: Vec<&str> = lines.iter().map(String::as_str).collect();
        options.push(RETURN_OPTION);

        let choice = console.prompt_selection(&options)?;
        Ok(records.into_iter().nth(choice))
    }

    /// Prompt for every persisted field until each one coerces.
    fn collect_attributes(
        &self,
        descriptor: &EntityDescriptor,
        console: &mut dyn Console,
    ) -> Result<AttributeSet, DbmsError> {
        let mut attributes = AttributeSet::new();

        for field in self.catalog.fields_of(descriptor) {
            console.message(&format!("Please enter the {}", field.name));
            loop {
                let raw = console.prompt_line()?;
                match coerce(&raw, field.value_type) {
                    Ok(value) => {
                        attributes.insert(field.name.to_string(), value);
                        break;
                    }
                    Err(err) => console.message(&err.to_string()),
                }
            }
        }

        Ok(attributes)
    }

    fn create_entry(&self, console: &mut dyn Console) -> Result<Outcome, DbmsError> {
        console.message("Creating an entry:");
        let mut session = self.stores.open()?;

        let Some(descriptor) = self.select_table(console)? else {
            return Ok(Outcome::Back);
        };

        let attributes = self.collect_attributes(descriptor, console)?;
        let record = build(descriptor, &attributes)?;

        session.add(record);
        session.save()?;

        tracing::info!(table = descriptor.table_name, "Created record");
        console.message("Successfully inserted data into table");
        Ok(Outcome::Completed)
    }

    fn read_table(&self, console: &mut dyn Console) -> Result<Outcome, DbmsError> {
        console.message("Reading a table:");
        let mut session = self.stores.open()?;

        let Some(descriptor) = self.select_table(console)? else {
            return Ok(Outcome::Back);
        };

        let records = session.get(descriptor.table_name)?;
        let lines = project_all(&records, descriptor);

        let mut page = Some(paginate(&lines, self.page_size));
        while let Some(current) = page {
            console.display_lines(current.slice(&lines));
            console.message(&format!(
                "Page {} of {} ({} entries)",
                current.index(),
                current.total_pages().max(1),
                current.total_items()
            ));

            let actions = current.actions();
            let labels: Vec<&str> = actions.iter().map(PageAction::label).collect();

            console.message("What would you like to do?");
            let action = actions[console.prompt_selection(&labels)?];
            if let Some(announcement) = action.announcement() {
                console.message(announcement);
            }

            page = current.navigate(action);
        }

        Ok(Outcome::Completed)
    }

    fn update_entry(&self, console: &mut dyn Console) -> Result<Outcome, DbmsError> {
        console.message("Update an entry:");
        let mut session = self.stores.open()?;

        let Some(descriptor) = self.select_table(console)? else {
            return Ok(Outcome::Back);
        };

        console.message("Please pick an entry to update:");
        let Some(original) = self.select_record(session.as_mut(), descriptor, console)? else {
            return Ok(Outcome::Back);
        };

        let fields: Vec<&str> = self
            .catalog
            .fields_of(descriptor)
            .iter()
            .map(|field| field.name)
            .collect();
        if fields.is_empty() {
            return Err(DbmsError::not_found("editable field on", descriptor.table_name));
        }

        let mut updated = original.clone();
        loop {
            console.message("Please pick a property to modify:");
            let field_name = fields[console.prompt_selection(&fields)?];

            console.message(&format!("Please enter the new {}", field_name));
            loop {
                let raw = console.prompt_line()?;
                match apply_field(updated.as_mut(), field_name, &raw) {
                    Ok(_) => break,
                    Err(DbmsError::TypeMismatch { expected, .. }) => console.message(&format!(
                        "Input not correct type, expecting {}",
                        expected
                    )),
                    Err(err) => return Err(err),
                }
            }

            console.message("Are there any more changes you'd like to make?");
            if console.prompt_selection(&[ACCEPT_OPTION, DENY_OPTION])? == 1 {
                break;
            }
        }

        session.update(original, updated);
        session.save()?;

        tracing::info!(table = descriptor.table_name, "Updated record");
        console.message("Successfully updated entry.");
        Ok(Outcome::Completed)
    }

    fn delete_entry(&self, console: &mut dyn Console) -> Result<Outcome, DbmsError> {
        console.message("Deleting an entry:");
        let mut session = self.stores.open()?;

        let Some(descriptor) = self.select_table(console)? else {
            return Ok(Outcome::Back);
        };

        console.message("Please pick an entry to delete:");
        let Some(record) = self.select_record(session.as_mut(), descriptor, console)? else {
            return Ok(Outcome::Back);
        };

        session.remove(record);
        session.save()?;

        tracing::info!(table = descriptor.table_name, "Deleted record");
        console.message("Entry successfully removed.");
        Ok(Outcome::Completed)
    }

    fn import_from_file(&self, console: &mut dyn Console) -> Result<Outcome, DbmsError> {
        console.message("Please input the file path:");
        let path = console.prompt_line()?;

        let lines = read_import_file(path.trim())?;
        let parsed = parse(&lines, self.catalog);
        for issue in &parsed.issues {
            console.message(&issue.to_string());
        }

        let summary = import_batch(self.stores, &parsed);
        for outcome in &summary.outcomes {
            console.message(&outcome.to_string());
        }
        console.message(&summary.to_string());

        Ok(Outcome::Completed)
    }
}
