//! Interactive menu
//!
//! Asks for a mode and its parameters, then hands back a [`JobRequest`].
//! Answers are returned as typed text; empty answers and garbage are left
//! for the normalizer, so the menu and the CLI flags behave the same.

use crate::errors::Result;
use crate::job::{defaults, JobRequest, RawParams};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use shared_utils::clean_path_input;
use shared_utils::modern_ui::{print_banner, symbols};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Create,
    Compress,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] = [MenuChoice::Create, MenuChoice::Compress, MenuChoice::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Create => "Generate a GIF from a video",
            MenuChoice::Compress => "Compress an existing GIF",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// `"FPS [30]"`
fn prompt_with_default(label: &str, default: impl Display) -> String {
    format!("{} [{}]", label, default)
}

fn ask_source(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    let answer = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            let path = clean_path_input(input);
            if path.is_file() {
                Ok(())
            } else {
                Err(format!("File not found: {}", path.display()))
            }
        })
        .interact_text()?;
    Ok(answer)
}

fn ask_optional(theme: &ColorfulTheme, prompt: String) -> Result<String> {
    let answer = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(answer)
}

fn section(title: &str, hint: &str) {
    print_banner(title);
    println!("{}", style(hint).dim());
}

fn ask_create(theme: &ColorfulTheme) -> Result<JobRequest> {
    section(
        "OPTION 1: CREATE A GIF FROM A VIDEO",
        "Provide the following parameters to create your GIF:",
    );
    let source = ask_source(theme, "Video file path (e.g. /path/my_video.mov)")?;
    let frame_rate = ask_optional(theme, prompt_with_default("FPS", defaults::CREATE_FRAME_RATE))?;
    let width = ask_optional(theme, prompt_with_default("Width", defaults::CREATE_WIDTH))?;
    let speed_factor = ask_optional(
        theme,
        prompt_with_default("Duration factor", format!("{:.1}", defaults::CREATE_SPEED.get())),
    )?;

    Ok(JobRequest::Create {
        params: RawParams {
            source,
            frame_rate,
            width,
        },
        speed_factor,
        output_dir: None,
    })
}

fn ask_compress(theme: &ColorfulTheme) -> Result<JobRequest> {
    section(
        "OPTION 2: COMPRESS AN EXISTING GIF",
        "Provide the following parameters to compress your GIF:",
    );
    let source = ask_source(theme, "GIF file to compress")?;
    let frame_rate = ask_optional(
        theme,
        prompt_with_default("Target FPS", defaults::COMPRESS_FRAME_RATE),
    )?;
    let width = ask_optional(theme, prompt_with_default("Width", defaults::COMPRESS_WIDTH))?;
    let max_colors = ask_optional(
        theme,
        prompt_with_default("Max colors", defaults::COMPRESS_MAX_COLORS),
    )?;

    Ok(JobRequest::Compress {
        params: RawParams {
            source,
            frame_rate,
            width,
        },
        max_colors,
    })
}

/// Show the menu. `Ok(None)` means the user chose to leave.
pub fn prompt_job() -> Result<Option<JobRequest>> {
    let theme = ColorfulTheme::default();

    print_banner("GIF GENERATOR AND COMPRESSOR");
    let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
    let selection = Select::with_theme(&theme)
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match MenuChoice::from_index(selection) {
        Some(MenuChoice::Create) => ask_create(&theme).map(Some),
        Some(MenuChoice::Compress) => ask_compress(&theme).map(Some),
        Some(MenuChoice::Exit) | None => Ok(None),
    }
}

pub fn print_farewell() {
    println!("{} Exiting...", symbols::DOOR);
    println!("{} Goodbye!", symbols::WAVE);
    println!();
}
