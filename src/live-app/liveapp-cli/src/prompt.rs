//! Interactive question flow for `live-app init`.

use anyhow::{Result, bail};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use liveapp_manifest::{
    Bundler, DEFAULT_INITIAL_HEIGHT, DEFAULT_VERSION_NAME, ManifestCustomization,
    ManifestOptions, NO_WIDTH, PackageOptions, SizingMode, ToolbarColor,
};
use std::collections::VecDeque;
use std::path::Path;

/// Accepts an answer or explains why it was rejected.
pub type Validator = fn(&str) -> Result<(), &'static str>;

/// Source of answers for the init questions.
pub trait Prompter {
    /// Ask for free text. An empty answer yields `default` when one is given.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask for text, re-asking until `validate` accepts the answer.
    fn input_validated(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: Validator,
    ) -> Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Ask the user to pick one of `items`; returns its index.
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize>;
}

// ============================================================================
// Terminal prompter
// ============================================================================

/// Prompts on the terminal using dialoguer.
pub struct TermPrompter {
    theme: ColorfulTheme,
}

impl TermPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TermPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn input_validated(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: Validator,
    ) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(move |answer: &String| validate(answer));
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?)
    }
}

// ============================================================================
// Scripted prompter
// ============================================================================

/// Answers prompts from a fixed list, in order.
///
/// An empty answer takes the prompt's default (the first item for
/// selections). Rejected answers are recorded and the next answer is tried,
/// the way a user would be asked again.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
    rejections: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Prompts shown so far, re-asks included.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Messages shown for rejected answers.
    pub fn rejections(&self) -> &[String] {
        &self.rejections
    }

    /// Answers that were never consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no scripted answer left for '{}'", prompt),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let answer = self.next_answer(prompt)?;
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn input_validated(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: Validator,
    ) -> Result<String> {
        loop {
            let answer = self.input(prompt, default)?;
            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(message) => self.rejections.push(message.to_string()),
            }
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = self.next_answer(prompt)?;
        match answer.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "y" | "yes" | "true" => Ok(true),
            "n" | "no" | "false" => Ok(false),
            other => bail!("'{}' is not a yes/no answer for '{}'", other, prompt),
        }
    }

    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        let answer = self.next_answer(prompt)?;
        if answer.is_empty() {
            return Ok(0);
        }
        items
            .iter()
            .position(|item| *item == answer)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "'{}' is not one of {} for '{}'",
                    answer,
                    items.join(", "),
                    prompt
                )
            })
    }
}

// ============================================================================
// Question flow
// ============================================================================

const APP_NAME_PROMPT: &str = "What is the name of this app?";
const PACKAGE_NAME_PROMPT: &str = "Package name";
const DESCRIPTION_PROMPT: &str = "Description";
const TYPESCRIPT_PROMPT: &str = "Use TypeScript?";
const CUSTOMIZE_PROMPT: &str = "Would you like to customize the manifest now?";
const VERSION_NAME_PROMPT: &str = "Version name";
const TOOLBAR_COLOR_PROMPT: &str = "Toolbar color";
const DISABLE_COMMENTS_PROMPT: &str = "Disable app-level comments?";
const SIZING_MODE_PROMPT: &str = "Sizing mode";
const HEIGHT_PROMPT: &str = "Initial height";
const WIDTH_PROMPT: &str = "Initial width";

fn validate_app_name(answer: &str) -> Result<(), &'static str> {
    if answer.trim().is_empty() {
        return Err("Please enter a name.");
    }
    Ok(())
}

fn validate_package_name(answer: &str) -> Result<(), &'static str> {
    let answer = answer.trim();
    if answer.is_empty() || answer == "." || answer == ".." {
        return Err("Please enter a package name.");
    }
    if answer.contains(['/', '\\']) {
        return Err("Package names cannot contain path separators.");
    }
    Ok(())
}

fn validate_height(answer: &str) -> Result<(), &'static str> {
    liveapp_manifest::parse_dimension(answer).map(|_| ())
}

fn validate_width(answer: &str) -> Result<(), &'static str> {
    liveapp_manifest::parse_width(answer).map(|_| ())
}

/// Ask every init question in order and assemble the option records.
///
/// The manifest description always mirrors the package description.
pub fn collect_options(
    prompter: &mut dyn Prompter,
    cwd: &Path,
) -> Result<(PackageOptions, ManifestOptions)> {
    let dir_name = cwd
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let default_app_name = liveapp_manifest::display_name_from_dir(&dir_name);
    let app_name =
        prompter.input_validated(APP_NAME_PROMPT, Some(&default_app_name), validate_app_name)?;

    let default_package_name = liveapp_manifest::package_name_from_display(&app_name);
    let package_name = prompter
        .input_validated(
            PACKAGE_NAME_PROMPT,
            Some(&default_package_name),
            validate_package_name,
        )?
        .trim()
        .to_lowercase();
    let description = prompter.input(DESCRIPTION_PROMPT, None)?;
    let typescript = prompter.confirm(TYPESCRIPT_PROMPT, true)?;

    let customization = if prompter.confirm(CUSTOMIZE_PROMPT, true)? {
        Some(collect_customization(prompter)?)
    } else {
        None
    };

    let package = PackageOptions {
        name: package_name,
        description,
        typescript,
        bundler: Bundler::Webpack,
    };
    let manifest = ManifestOptions {
        name: app_name,
        description: package.description.clone(),
        customization,
    };
    tracing::debug!(?package, ?manifest, "collected init answers");

    Ok((package, manifest))
}

fn collect_customization(prompter: &mut dyn Prompter) -> Result<ManifestCustomization> {
    let version_name = prompter.input(VERSION_NAME_PROMPT, Some(DEFAULT_VERSION_NAME))?;

    let colors: Vec<&str> = ToolbarColor::ALL.iter().map(|c| c.as_str()).collect();
    let toolbar_color = ToolbarColor::ALL[prompter.select(TOOLBAR_COLOR_PROMPT, &colors)?];

    let disable_app_level_comments = prompter.confirm(DISABLE_COMMENTS_PROMPT, false)?;

    let modes: Vec<&str> = SizingMode::ALL.iter().map(|m| m.as_str()).collect();
    let sizing_mode = SizingMode::ALL[prompter.select(SIZING_MODE_PROMPT, &modes)?];

    let default_height = DEFAULT_INITIAL_HEIGHT.to_string();
    let height = prompter.input_validated(HEIGHT_PROMPT, Some(&default_height), validate_height)?;
    let initial_height = liveapp_manifest::parse_dimension(&height).map_err(anyhow::Error::msg)?;

    let width = prompter.input_validated(WIDTH_PROMPT, Some(NO_WIDTH), validate_width)?;
    let initial_width = liveapp_manifest::parse_width(&width).map_err(anyhow::Error::msg)?;

    Ok(ManifestCustomization {
        version_name,
        toolbar_color,
        disable_app_level_comments,
        sizing_mode,
        initial_height,
        initial_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveapp_manifest::{InitialWidth, NOT_A_NUMBER};
    use std::path::PathBuf;

    fn cwd(name: &str) -> PathBuf {
        PathBuf::from("/work").join(name)
    }

    #[test]
    fn defaults_come_from_directory_name() {
        let mut prompter = ScriptedPrompter::new(["", "", "", "", "n"]);
        let (package, manifest) = collect_options(&mut prompter, &cwd("team board")).unwrap();

        assert_eq!(manifest.name, "Team Board");
        assert_eq!(package.name, "team-board");
        assert_eq!(package.description, "");
        assert!(package.typescript);
        assert_eq!(package.bundler, Bundler::Webpack);
        assert_eq!(manifest.customization, None);
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn questions_are_asked_in_order() {
        let mut prompter = ScriptedPrompter::new([
            "", "", "", "", "y", "", "", "", "", "", "",
        ]);
        collect_options(&mut prompter, &cwd("app")).unwrap();
        assert_eq!(
            prompter.asked(),
            [
                APP_NAME_PROMPT,
                PACKAGE_NAME_PROMPT,
                DESCRIPTION_PROMPT,
                TYPESCRIPT_PROMPT,
                CUSTOMIZE_PROMPT,
                VERSION_NAME_PROMPT,
                TOOLBAR_COLOR_PROMPT,
                DISABLE_COMMENTS_PROMPT,
                SIZING_MODE_PROMPT,
                HEIGHT_PROMPT,
                WIDTH_PROMPT,
            ]
        );
    }

    #[test]
    fn package_name_is_forced_lowercase() {
        let mut prompter = ScriptedPrompter::new(["Board", "My-BOARD", "", "n", "n"]);
        let (package, _) = collect_options(&mut prompter, &cwd("x")).unwrap();
        assert_eq!(package.name, "my-board");
        assert!(!package.typescript);
    }

    #[test]
    fn package_name_default_follows_typed_app_name() {
        let mut prompter = ScriptedPrompter::new(["Sprint   Planner", "", "", "", "n"]);
        let (package, manifest) = collect_options(&mut prompter, &cwd("x")).unwrap();
        assert_eq!(manifest.name, "Sprint   Planner");
        assert_eq!(package.name, "sprint-planner");
    }

    #[test]
    fn manifest_description_mirrors_package_description() {
        let mut prompter = ScriptedPrompter::new(["", "", "Tracks sprints", "", "n"]);
        let (package, manifest) = collect_options(&mut prompter, &cwd("x")).unwrap();
        assert_eq!(package.description, "Tracks sprints");
        assert_eq!(manifest.description, "Tracks sprints");
    }

    #[test]
    fn empty_description_has_no_default() {
        let mut prompter = ScriptedPrompter::new(["", "", "", "", "n"]);
        let (package, manifest) = collect_options(&mut prompter, &cwd("x")).unwrap();
        assert_eq!(package.description, "");
        assert_eq!(manifest.description, "");

        let mut prompter = ScriptedPrompter::new([""]);
        assert_eq!(prompter.input(DESCRIPTION_PROMPT, None).unwrap(), "");
    }

    #[test]
    fn empty_directory_name_requires_typed_app_name() {
        let mut prompter = ScriptedPrompter::new(["", "Notes", "", "", "", "n"]);
        let (package, manifest) = collect_options(&mut prompter, &cwd("!!!")).unwrap();
        assert_eq!(manifest.name, "Notes");
        assert_eq!(package.name, "notes");
        assert_eq!(prompter.rejections(), ["Please enter a name."]);
    }

    #[test]
    fn customization_defaults() {
        let mut prompter = ScriptedPrompter::new([
            "", "", "", "", "", "", "", "", "", "", "",
        ]);
        let (_, manifest) = collect_options(&mut prompter, &cwd("app")).unwrap();
        assert_eq!(manifest.customization, Some(ManifestCustomization::default()));
    }

    #[test]
    fn customization_answers() {
        let mut prompter = ScriptedPrompter::new([
            "", "", "", "", "y", "2.0.0", "blue", "y", "scale", "480", "720",
        ]);
        let (_, manifest) = collect_options(&mut prompter, &cwd("app")).unwrap();
        let custom = manifest.customization.unwrap();
        assert_eq!(custom.version_name, "2.0.0");
        assert_eq!(custom.toolbar_color, ToolbarColor::Blue);
        assert!(custom.disable_app_level_comments);
        assert_eq!(custom.sizing_mode, SizingMode::Scale);
        assert_eq!(custom.initial_height, 480);
        assert_eq!(custom.initial_width, InitialWidth::Pixels(720));
    }

    #[test]
    fn non_numeric_dimensions_are_asked_again() {
        let mut prompter = ScriptedPrompter::new([
            "", "", "", "", "y", "", "", "", "", "tall", "none", "480", "12.5", "wide", "none",
        ]);
        let (_, manifest) = collect_options(&mut prompter, &cwd("app")).unwrap();
        let custom = manifest.customization.unwrap();
        assert_eq!(custom.initial_height, 480);
        assert_eq!(custom.initial_width, InitialWidth::Unspecified);
        assert_eq!(prompter.rejections(), [NOT_A_NUMBER; 4]);
    }

    #[test]
    fn running_out_of_answers_is_an_error() {
        let mut prompter = ScriptedPrompter::new(["", ""]);
        let err = collect_options(&mut prompter, &cwd("app")).unwrap_err();
        assert!(err.to_string().contains(DESCRIPTION_PROMPT), "{err}");
    }
}
