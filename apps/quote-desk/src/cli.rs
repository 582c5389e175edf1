//! # Command-Line Shell
//!
//! Every invocation signs in, runs one command against the session, and
//! exits.
//!
//! ```text
//! quote-desk --email me@mabric.in --password ****** new \
//!     --client-name "Asha Rao" --project-name "Villa 12" \
//!     --item "Wardrobe;7;10;1250" --item "Loft;7;2;900"
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::{App, DeskSession};
use quote_core::{HeaderFields, ItemPatch, QuotationForm, QuotationRecord, QuotationView};
use quote_export::{deliver, exporter_for, print_quotation, ExportFormat, ExportTarget, FileViewer};

#[derive(Parser, Debug)]
#[command(name = "quote-desk", version, about = "Mabric quotation generator")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "QUOTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Account email
    #[arg(long, global = true, env = "QUOTE_EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "QUOTE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        full_name: String,
    },

    /// Create a quotation
    New(QuotationArgs),

    /// Replace the contents of an existing quotation
    Edit {
        quotation_number: String,
        #[command(flatten)]
        args: QuotationArgs,
    },

    /// List your quotations, newest first
    List,

    /// Show one quotation
    Show { quotation_number: String },

    /// Delete a quotation
    Delete { quotation_number: String },

    /// Write a quotation as PDF, XLSX, CSV or HTML
    Export {
        quotation_number: String,
        #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
        format: FormatArg,
        /// Output directory (defaults to export.output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write the print page and report where it is
    Print {
        quotation_number: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FormatArg {
    Pdf,
    Xlsx,
    Csv,
    Html,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Html => ExportFormat::Html,
        }
    }
}

/// Header and client fields. Unset flags keep their current value on edit.
#[derive(Args, Debug, Default, Clone)]
pub struct QuotationArgs {
    #[arg(long)]
    pub client_name: Option<String>,
    #[arg(long)]
    pub client_company: Option<String>,
    #[arg(long)]
    pub client_address: Option<String>,
    #[arg(long)]
    pub client_email: Option<String>,
    #[arg(long)]
    pub client_phone: Option<String>,
    #[arg(long)]
    pub terms: Option<String>,

    #[arg(long)]
    pub survey_number: Option<String>,
    #[arg(long)]
    pub project_name: Option<String>,
    #[arg(long)]
    pub house_number: Option<String>,
    /// Overrides the client name when set
    #[arg(long)]
    pub customer_name: Option<String>,
    /// Overrides the client phone when set
    #[arg(long)]
    pub mobile: Option<String>,
    /// Quotation date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// "particulars;length;width;price_per_sqft", repeatable.
    /// On edit, any --item replaces all items.
    #[arg(long = "item")]
    pub items: Vec<String>,
}

impl QuotationArgs {
    /// Applies the flags to a form and header.
    pub fn apply(&self, form: &mut QuotationForm, header: &mut HeaderFields) -> AppResult<()> {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.clone();
            }
        };

        set(&mut form.client_name, &self.client_name);
        set(&mut form.client_company, &self.client_company);
        set(&mut form.client_address, &self.client_address);
        set(&mut form.client_email, &self.client_email);
        set(&mut form.client_phone, &self.client_phone);
        set(&mut form.terms, &self.terms);

        set(&mut header.survey_number, &self.survey_number);
        set(&mut header.project_name, &self.project_name);
        set(&mut header.house_number, &self.house_number);
        // The header fields win over the client block, so a renamed client
        // must be carried into them as well.
        set(&mut header.customer_name, &self.customer_name.clone().or(self.client_name.clone()));
        set(&mut header.mobile, &self.mobile.clone().or(self.client_phone.clone()));
        if let Some(date) = self.date {
            header.date = date;
        }

        if !self.items.is_empty() {
            form.items.clear();
            for (index, raw) in self.items.iter().enumerate() {
                let patch = parse_item(raw)?;
                form.add_item();
                form.update_item(index, &patch);
            }
        }

        Ok(())
    }
}

/// Parses `particulars;length;width;price`. Missing numbers count as zero.
pub fn parse_item(raw: &str) -> AppResult<ItemPatch> {
    let parts: Vec<&str> = raw.split(';').map(str::trim).collect();
    if parts.len() > 4 {
        return Err(AppError::validation(format!(
            "item '{}' has more than 4 fields (particulars;length;width;price)",
            raw
        )));
    }

    let field = |i: usize| parts.get(i).copied().unwrap_or("");
    Ok(ItemPatch::new()
        .description(field(0))
        .length(field(1))
        .width(field(2))
        .price_per_area(field(3)))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one command.
pub async fn execute(cli: Cli, app: &App) -> AppResult<()> {
    let mut session = app.session();

    let email = cli
        .email
        .as_deref()
        .ok_or_else(|| AppError::validation("--email is required"))?;
    let password = cli
        .password
        .as_deref()
        .ok_or_else(|| AppError::validation("--password is required"))?;

    if let Command::Signup { full_name } = &cli.command {
        let user = session.sign_up(email, password, full_name).await?;
        println!("Signed up as {} ({})", user.display_name(), user.email);
        return Ok(());
    }

    session.sign_in(email, password).await?;

    match cli.command {
        Command::Signup { .. } => {}
        Command::New(args) => {
            let mut form = QuotationForm::new();
            let mut header = HeaderFields::new(session.today());
            args.apply(&mut form, &mut header)?;

            let saved = session.submit(&form, &header, None).await?;
            print_record(app, &saved);
        }
        Command::Edit {
            quotation_number,
            args,
        } => {
            let existing = find(&session, &quotation_number)?;
            let id = existing
                .id
                .clone()
                .ok_or_else(|| AppError::internal("stored quotation has no id"))?;

            let mut form = QuotationForm::from_record(&existing);
            let mut header = HeaderFields::from_record(&existing);
            args.apply(&mut form, &mut header)?;

            let saved = session.submit(&form, &header, Some(&id)).await?;
            print_record(app, &saved);
        }
        Command::List => {
            if session.records().is_empty() {
                println!("No quotations yet.");
            }
            for record in session.records() {
                let view = app.view(record);
                println!(
                    "{}  {}  {:<30}  {:>18}",
                    view.quotation_number,
                    view.date,
                    view.client_heading(),
                    view.grand_total
                );
            }
        }
        Command::Show { quotation_number } => {
            let record = find(&session, &quotation_number)?;
            print_record(app, &record);
        }
        Command::Delete { quotation_number } => {
            let record = find(&session, &quotation_number)?;
            if let Some(id) = &record.id {
                session.delete(id).await?;
            }
            println!("Deleted {}", quotation_number);
        }
        Command::Export {
            quotation_number,
            format,
            out,
        } => {
            let record = find(&session, &quotation_number)?;
            let view = app.view(&record);
            let target = ExportTarget::directory(out.unwrap_or_else(|| app.export_dir()));
            let exporter = exporter_for(format.into());

            match deliver(exporter.as_ref(), &view, &target)? {
                Some(path) => println!("Wrote {}", path.display()),
                None => println!("Nothing written: {} is not writable", target.dir().display()),
            }
        }
        Command::Print {
            quotation_number,
            out,
        } => {
            let record = find(&session, &quotation_number)?;
            let view = app.view(&record);
            let mut viewer = FileViewer::new(out.unwrap_or_else(|| app.export_dir()));

            if print_quotation(&view, &mut viewer)? {
                if let Some(path) = viewer.last_opened() {
                    println!("Open {} in a browser to print", path.display());
                }
            } else {
                println!("Print view could not be opened");
            }
        }
    }

    info!("Command finished");
    Ok(())
}

fn find(session: &DeskSession, quotation_number: &str) -> AppResult<QuotationRecord> {
    session
        .find_by_number(quotation_number)
        .cloned()
        .ok_or_else(|| AppError::not_found("Quotation", quotation_number))
}

fn print_record(app: &App, record: &QuotationRecord) {
    let view = app.view(record);

    println!("{}", view.title);
    println!("Quotation No: {}", view.quotation_number);
    println!("Date:         {}", view.date);
    println!("Valid Until:  {}", view.valid_until);
    if let Some(project) = &view.project_name {
        println!("Project:      {}", project);
    }
    println!("Client:       {}", view.client_heading());
    println!();
    for row in &view.rows {
        println!(
            "{:>3}. {:<30} {:>8} x {:<8} = {:>10} sqft @ {:>14} = {:>16}",
            row.index, row.particulars, row.length, row.width, row.area, row.price, row.amount
        );
    }
    println!();
    println!("{:>60} {:>18}", "Subtotal:", view.subtotal);
    println!("{:>60} {:>18}", format!("{}:", view.tax_label), view.tax_amount);
    println!("{:>60} {:>18}", "Grand Total:", view.grand_total);
}

// =============================================================================
// Unit Tests
// =============================================================================
