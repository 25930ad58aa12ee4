use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use holocron::{
    Catalog, CharacterField, CharacterListing, CharacterRecord, CharacterSource, CharacterView,
    EditSession, KeyValueStorage, ListQuery, OverlayMap, Route,
};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct CharacterCommand {
    #[command(subcommand)]
    pub command: CharacterSubcommand,
}

#[derive(Subcommand)]
pub enum CharacterSubcommand {
    /// List characters, one page at a time
    List {
        /// Page number (1-based)
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Only characters whose name matches
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a character's details
    Show {
        /// Character ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Edit a character locally
    Edit {
        /// Character ID
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List every locally edited character
    Edited {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Open a shareable location such as "/?page=2&search=sky" or "/character/1"
    Open {
        /// Location to open
        route: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// New values for the editable attributes. Omitted ones keep their value.
#[derive(Args, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub birth_year: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    /// Height in cm
    #[arg(long)]
    pub height: Option<String>,
    /// Mass in kg
    #[arg(long)]
    pub mass: Option<String>,
    #[arg(long)]
    pub hair_color: Option<String>,
    #[arg(long)]
    pub skin_color: Option<String>,
    #[arg(long)]
    pub eye_color: Option<String>,
}

impl FieldArgs {
    /// The fields given on the command line, in display order.
    pub fn edits(&self) -> Vec<(CharacterField, &str)> {
        [
            (CharacterField::Name, &self.name),
            (CharacterField::BirthYear, &self.birth_year),
            (CharacterField::Gender, &self.gender),
            (CharacterField::Height, &self.height),
            (CharacterField::Mass, &self.mass),
            (CharacterField::HairColor, &self.hair_color),
            (CharacterField::SkinColor, &self.skin_color),
            (CharacterField::EyeColor, &self.eye_color),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

impl CharacterCommand {
    pub async fn run<R, S>(
        &self,
        catalog: &Catalog<R, S>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        R: CharacterSource,
        S: KeyValueStorage,
    {
        match &self.command {
            CharacterSubcommand::List {
                page,
                search,
                format,
            } => {
                let query = ListQuery::new(*page, search.clone().unwrap_or_default());
                let listing = catalog.list(&query).await?;
                print_listing(&listing, format)
            }

            CharacterSubcommand::Show { id, format } => {
                let view = catalog.character(id).await?;
                print_view(&view, format)
            }

            CharacterSubcommand::Edit { id, fields } => {
                let view = catalog.character(id).await?;

                let mut session = EditSession::new(view);
                session.begin_edit();
                for (field, value) in fields.edits() {
                    session.set_field(field, value)?;
                }
                let saved = session.save(catalog.overlay())?;

                println!("Character information saved successfully!\n");
                println!("{}", render_view(saved));
                Ok(())
            }

            CharacterSubcommand::Edited { format } => {
                let edited = catalog.overlay().get_all();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&edited)?);
                    }
                    OutputFormat::Text => print!("{}", render_edited(&edited)),
                }
                Ok(())
            }

            CharacterSubcommand::Open { route, format } => {
                let ticket = catalog.begin_navigation();
                match Route::parse(route) {
                    Route::List(query) => {
                        if let Some(listing) = catalog.list_latest(ticket, &query).await? {
                            print_listing(&listing, format)?;
                        }
                        Ok(())
                    }
                    Route::Detail(id) => {
                        if let Some(view) = catalog.character_latest(ticket, &id).await? {
                            print_view(&view, format)?;
                        }
                        Ok(())
                    }
                    Route::NotFound(location) => Err(format!("No view at '{}'", location).into()),
                }
            }
        }
    }
}

/// JSON shape of a single character: the record plus its edit flag.
#[derive(Serialize)]
struct ViewJson<'a> {
    #[serde(flatten)]
    character: &'a CharacterRecord,
    #[serde(rename = "isEdited")]
    is_edited: bool,
}

fn print_view(
    view: &CharacterView,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            let json = ViewJson {
                character: view.record(),
                is_edited: view.is_edited(),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => println!("{}", render_view(view)),
    }
    Ok(())
}

fn print_listing(
    listing: &CharacterListing,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(listing)?),
        OutputFormat::Text => print!("{}", render_listing(listing)),
    }
    Ok(())
}

fn render_view(view: &CharacterView) -> String {
    if view.is_edited() {
        format!("{}\n\n[Edited]", view.record())
    } else {
        view.record().to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

fn render_listing(listing: &CharacterListing) -> String {
    if listing.is_empty() {
        return "No characters found\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<5}  {:<30}  {:<10}  {:<13}  EDITED\n",
        "ID", "NAME", "BIRTH YEAR", "GENDER"
    ));
    out.push_str(&format!("{}\n", "-".repeat(72)));
    for entry in &listing.entries {
        let character = &entry.character;
        out.push_str(&format!(
            "{:<5}  {:<30}  {:<10}  {:<13}  {}\n",
            entry.id.as_deref().unwrap_or("-"),
            truncate(&character.name, 30),
            truncate(&character.birth_year, 10),
            truncate(&character.gender, 13),
            if entry.edited { "yes" } else { "" }
        ));
    }
    out.push_str(&format!(
        "\nPage {} of {} ({} character(s))\n",
        listing.query.page, listing.total_pages, listing.count
    ));
    if listing.query.page < listing.total_pages {
        let next = Route::List(listing.query.with_page(listing.query.page + 1));
        out.push_str(&format!("Next: {}\n", next));
    }
    out
}

fn render_edited(edited: &OverlayMap) -> String {
    if edited.is_empty() {
        return "No edited characters\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{:<5}  NAME\n", "ID"));
    out.push_str(&format!("{}\n", "-".repeat(40)));
    for (id, local) in edited {
        out.push_str(&format!("{:<5}  {}\n", id, local.character.name));
    }
    out.push_str(&format!("\nTotal: {} edited character(s)\n", edited.len()));
    out
}
