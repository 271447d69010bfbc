use crate::config::PlanOptions;
use crate::units::{format_size, parse_size};
use anyhow::{Context, Result};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

/// True when plan options should be gathered interactively: stdin is a
/// terminal and the user passed no plan-shaping flags.
pub(crate) fn should_prompt(any_option_given: bool) -> bool {
    !any_option_given && io::stdin().is_terminal()
}

fn ask(question: &str) -> Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{question}").context("failed to write prompt")?;
    stdout.flush().context("failed to flush prompt")?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("failed to read answer")?;
    Ok(line.trim().to_string())
}

fn ask_list(question: &str) -> Result<Vec<String>> {
    let answer = ask(question)?;
    Ok(answer.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
}

/// Ask until the answer parses as a size; empty keeps the default.
fn ask_size(label: &str, default: u64) -> Result<u64> {
    loop {
        let answer = ask(&format!("{label} [{}]: ", format_size(default as i64)))?;
        if answer.is_empty() {
            return Ok(default);
        }
        match parse_size(&answer) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "  {e}").context("failed to write prompt")?;
            }
        }
    }
}

fn ask_yes_no(question: &str, default: bool) -> Result<bool> {
    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    let answer = ask(&format!("{question} {suffix}: "))?.to_ascii_lowercase();
    Ok(match answer.as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

/// Walk through every plan option with the same defaults the flags have.
pub(crate) fn prompt_plan_options() -> Result<PlanOptions> {
    let defaults = PlanOptions::default();

    let src = ask_list("Source disks to evacuate (comma-separated, empty = auto): ")?;
    let dest = ask_list("Destination disks (comma-separated, empty = auto-discover): ")?;
    let min_space_bytes = ask_size("Reserved headroom per destination", defaults.min_space_bytes)?;
    let min_file_size_bytes = ask_size("Minimum file size", defaults.min_file_size_bytes)?;
    let path_filters = ask_list("Path prefixes to restrict moves to (comma-separated): ")?;
    let includes = ask_list("Include patterns (reserved, comma-separated): ")?;
    let excludes = ask_list("Scan-time exclude substrings (comma-separated): ")?;
    let min_split_size_bytes =
        ask_size("Folder split threshold (reserved)", defaults.min_split_size_bytes)?;

    let threshold_answer = ask(&format!(
        "Move-as-folder threshold (reserved) [{}]: ",
        defaults.move_as_folder_threshold
    ))?;
    let move_as_folder_threshold = if threshold_answer.is_empty() {
        defaults.move_as_folder_threshold
    } else {
        threshold_answer.parse().unwrap_or(defaults.move_as_folder_threshold)
    };

    let plan_answer = ask(&format!("Plan file [{}]: ", defaults.plan_file.display()))?;
    let plan_file =
        if plan_answer.is_empty() { defaults.plan_file } else { PathBuf::from(plan_answer) };

    let force = ask_yes_no("Overwrite an existing plan file without asking?", false)?;

    Ok(PlanOptions {
        src,
        dest,
        min_space_bytes,
        min_file_size_bytes,
        path_filters,
        includes,
        excludes,
        min_split_size_bytes,
        move_as_folder_threshold,
        plan_file,
        force,
        debug: false,
    })
}

/// Confirm overwriting an existing plan file. Non-interactive sessions
/// without --force refuse rather than guess.
pub(crate) fn confirm_overwrite(path: &std::path::Path) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }
    ask_yes_no(&format!("Plan file {} exists; overwrite?", path.display()), false)
}
