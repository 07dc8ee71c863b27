//! The interactive menu session.
//!
//! A [`Session`] owns the operator's input and output streams and drives the
//! warehouse through the menu. It is generic over the streams so the whole
//! dialogue can be replayed from a buffer.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use stockroom_core::{Entity, Price, ProductId};
use stockroom_infra::{LoadOutcome, ProductFile};
use stockroom_inventory::Warehouse;
use stockroom_products::{Product, ProductKind, ProductKindTag, validate_name};

use crate::input::{self, InputError};
use crate::menu::{MENU_TEXT, MenuChoice};

pub struct Session<R, W> {
    warehouse: Arc<Warehouse>,
    file: ProductFile,
    input: R,
    output: W,
    today: Box<dyn Fn() -> NaiveDate>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(warehouse: Arc<Warehouse>, file: ProductFile, input: R, output: W) -> Self {
        Self {
            warehouse,
            file,
            input,
            output,
            today: Box::new(|| Local::now().date_naive()),
        }
    }

    /// Use a fixed source for "today" when listing expired products.
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Fill the warehouse from the data file and tell the operator how it went.
    ///
    /// A file that cannot be read leaves the warehouse as it was; the session
    /// carries on either way.
    pub fn load(&mut self) -> io::Result<()> {
        writeln!(self.output, "Data file: {}", self.file.path().display())?;
        match self.file.load_into(&self.warehouse) {
            Ok(LoadOutcome::Missing) => {
                writeln!(self.output, "File not found, a new one will be created on save.")
            }
            Ok(LoadOutcome::Loaded { loaded, skipped }) => {
                for line in &skipped {
                    writeln!(self.output, "Skipped damaged {line}")?;
                }
                writeln!(self.output, "Loaded {loaded} products.")
            }
            Err(err) => {
                error!(error = %err, "failed to load data file");
                writeln!(self.output, "Could not load data: {err}")
            }
        }
    }

    /// Run the menu until the operator picks exit or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{MENU_TEXT}")?;
            let Some(line) = self.prompt("> ")? else {
                debug!("end of input, leaving menu");
                return Ok(());
            };

            match line.parse::<MenuChoice>() {
                Ok(MenuChoice::ListAll) => self.list_all()?,
                Ok(MenuChoice::ListExpired) => self.list_expired()?,
                Ok(MenuChoice::Add) => self.add_product()?,
                Ok(MenuChoice::Remove) => self.remove_product()?,
                Ok(MenuChoice::Save) => self.save()?,
                Ok(MenuChoice::Exit) => return Ok(()),
                Err(other) => writeln!(self.output, "Unknown option: {other:?}")?,
            }
        }
    }

    /// Write the warehouse to the data file. Failures are reported, not returned.
    pub fn save(&mut self) -> io::Result<()> {
        match self.file.save_from(&self.warehouse) {
            Ok(count) => writeln!(self.output, "Saved {count} products."),
            Err(err) => {
                error!(error = %err, "failed to save data file");
                writeln!(self.output, "Could not save data: {err}")
            }
        }
    }

    fn list_all(&mut self) -> io::Result<()> {
        let products = self.warehouse.list_all();
        self.print_products(&products, "Warehouse is empty.")
    }

    fn list_expired(&mut self) -> io::Result<()> {
        let as_of = (self.today)();
        let expired = self.warehouse.list_expired_food(as_of);
        self.print_products(&expired, "No expired products.")
    }

    fn print_products(&mut self, products: &[Product], when_empty: &str) -> io::Result<()> {
        if products.is_empty() {
            return writeln!(self.output, "{when_empty}");
        }
        for product in products {
            writeln!(self.output, "{product}")?;
        }
        Ok(())
    }

    fn add_product(&mut self) -> io::Result<()> {
        match self.read_new_product() {
            Ok(product) => {
                let id = product.id();
                info!(%id, name = product.name(), "product added");
                self.warehouse.add(product);
                writeln!(self.output, "Product added with ID = {id}")
            }
            Err(InputError::Io(err)) => Err(err),
            Err(err) => writeln!(self.output, "Input error: {err}"),
        }
    }

    /// Ask for every field; the id is only drawn once all of them are valid.
    fn read_new_product(&mut self) -> Result<Product, InputError> {
        let tag: ProductKindTag = self.ask("Kind (food/electronics): ")?.parse()?;
        let name = validate_name(&self.ask("Name: ")?)?.to_string();
        let price = Price::parse(&self.ask("Price: ")?)?;
        let quantity = input::parse_whole_number(&self.ask("Quantity: ")?)?;
        let kind = match tag {
            ProductKindTag::Food => ProductKind::Food {
                expiration_date: input::parse_date(&self.ask("Expiration date (YYYY-MM-DD): ")?)?,
            },
            ProductKindTag::Electronics => ProductKind::Electronics {
                warranty_months: input::parse_whole_number(&self.ask("Warranty (months): ")?)?,
            },
        };

        let id = self.warehouse.generate_id();
        Ok(Product::new(id, name, price, quantity, kind))
    }

    fn remove_product(&mut self) -> io::Result<()> {
        let id = match self.ask("ID to remove: ") {
            Ok(raw) => raw.parse::<ProductId>().map_err(InputError::from),
            Err(err) => Err(err),
        };
        match id {
            Ok(id) => {
                let removed = self.warehouse.remove_by_id(id);
                info!(%id, removed, "remove requested");
                if removed == 0 {
                    writeln!(self.output, "No product with ID = {id}.")
                } else {
                    writeln!(self.output, "Removed product with ID = {id}.")
                }
            }
            Err(InputError::Io(err)) => Err(err),
            Err(err) => writeln!(self.output, "Input error: {err}"),
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        self.prompt(prompt)?.ok_or(InputError::EndOfInput)
    }

    /// Print `prompt` and read one line without its line terminator.
    /// `None` means the input is exhausted.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
