//! Terminal form collection.
//!
//! Prompts for each field in schema order. An empty or invalid entry is reported and asked
//! again; defaults are shown as a hint and never filled in.

use anyhow::{anyhow, bail, Context};
use hdp_core::{DomainSchema, FieldKind, FieldSpec, RawInputs};
use std::io::{BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Collect every field of `schema`, asking only for those not already in `preset`.
    ///
    /// Preset values are validated like typed ones but are not re-asked: a bad preset is an
    /// error, since it came from the command line rather than the prompt.
    pub fn collect(
        &mut self,
        schema: &DomainSchema,
        preset: &RawInputs,
    ) -> anyhow::Result<RawInputs> {
        let mut checked = RawInputs::new();
        for name in preset.names() {
            let field = schema
                .field(name)
                .ok_or_else(|| anyhow!("{} has no field named {name:?}", schema.domain))?;
            let value = preset
                .get(name)
                .map(|v| resolve_choice(field, v.trim()))
                .unwrap_or_default();
            field
                .validate_raw(&value)
                .map_err(|reason| anyhow!("--set {name}: {reason}"))?;
            checked.insert(field.name, value.trim());
        }

        let mut raw = RawInputs::new();
        for field in &schema.fields {
            let value = match checked.get(field.name) {
                Some(value) => value.to_string(),
                None => self.ask(field)?,
            };
            raw.insert(field.name, value.trim());
        }
        Ok(raw)
    }

    /// Ask for one field until a valid entry is given.
    pub fn ask(&mut self, field: &FieldSpec) -> anyhow::Result<String> {
        if !field.options().is_empty() {
            writeln!(self.output, "{}:", field.label)?;
            for option in field.options() {
                writeln!(self.output, "  - {}", option.label)?;
            }
        }

        loop {
            write!(self.output, "{}", prompt_text(field))?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read from the terminal")?;
            if read == 0 {
                bail!("input ended before {} was entered", field.label);
            }

            let entry = resolve_choice(field, line.trim());
            match field.validate_raw(&entry) {
                Ok(()) => return Ok(entry),
                Err(reason) => writeln!(self.output, "  {reason}, please try again")?,
            }
        }
    }
}

fn prompt_text(field: &FieldSpec) -> String {
    match &field.kind {
        FieldKind::Numeric(spec) => match spec.default {
            Some(default) => format!(
                "{} [{} to {}, e.g. {default}]: ",
                field.label, spec.min, spec.max
            ),
            None => format!("{} [{} to {}]: ", field.label, spec.min, spec.max),
        },
        FieldKind::Choice { .. } => format!("{}> ", field.label),
    }
}

/// Map a choice entry to its exact label when it matches one label ignoring case.
/// Anything else is returned unchanged for validation to judge.
fn resolve_choice(field: &FieldSpec, entry: &str) -> String {
    let options = field.options();
    if options.iter().any(|o| o.label == entry) {
        return entry.to_string();
    }
    let mut matches = options
        .iter()
        .filter(|o| o.label.eq_ignore_ascii_case(entry));
    match (matches.next(), matches.next()) {
        (Some(option), None) => option.label.to_string(),
        _ => entry.to_string(),
    }
}
