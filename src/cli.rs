//! Clap binder for declared-argument leaves.
//!
//! This module is the **optional integration layer** between the
//! framework-free core and the [clap](https://docs.rs/clap) parser. It is
//! compiled only when the `clap` cargo feature is enabled (on by default).
//! The core side of the contract is [`ArgumentSpec`]: leaves carrying one
//! are walked depth-first, registered as flags, and later filled back in
//! from the parsed matches.
//!
//! Flag shapes:
//! - value-taking domains get `--flag <METAVAR>` where the metavar is the
//!   explicit destination uppercased or a coarse domain label
//!   (`STR`/`INT`/`FLOAT`/`LIST`/`VALUE`);
//! - boolean leaves currently `false` get a presence flag that sets `true`
//!   (plus a paired `--disable-<flag>` when the binding asks for one);
//! - boolean leaves already `true` get only `--disable-<flag>`, setting
//!   `false`, with the help text prefixed `[DON'T] `.
//!
//! Importing copies a value out of the matches only when it actually came
//! from the command line, casts it through the leaf's domain (marking the
//! leaf user-set), and removes the consumed ids so callers can detect
//! leftover arguments. Arguments routed into a sub-command parse into that
//! sub-command's `ArgMatches`; pass those matches to
//! [`import_matches`](ConfigBlock::import_matches) separately.
//!
//! Flag names derive from each leaf's *local* key. Two bound leaves with
//! the same local name need an explicit [`ArgumentSpec::flag`] or
//! [`ArgumentSpec::dest`] to stay distinct.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_yaml::Value;

use crate::block::ConfigBlock;
use crate::error::ConfigError;
use crate::leaf::ConfigValue;
use crate::node::Node;
use crate::types::{ArgGroup, ArgumentSpec};

impl ConfigBlock {
    /// Register one flag per declared-argument leaf of this subtree onto
    /// `cmd`. Sub-command routed flags land on the named sub-command,
    /// which is created when absent.
    pub fn initialize_command(&self, mut cmd: Command) -> Command {
        let mut leaves = Vec::new();
        collect_bound(self, &mut leaves);
        for leaf in leaves {
            for (arg, subcommand) in build_args(leaf) {
                cmd = match subcommand {
                    None => cmd.arg(arg),
                    Some(name) => {
                        if cmd.find_subcommand(&name).is_some() {
                            cmd.mut_subcommand(&name, |sub| sub.arg(arg))
                        } else {
                            cmd.subcommand(Command::new(name).arg(arg))
                        }
                    }
                };
            }
        }
        cmd
    }

    /// Copy each bound leaf's value out of `matches` into the tree. Only
    /// values that came from the command line are applied (and marked
    /// user-set); consumed ids are removed from `matches` either way, so
    /// whatever remains afterwards was not ours.
    pub fn import_matches(&mut self, matches: &mut ArgMatches) -> Result<(), ConfigError> {
        for child in self.entries.values_mut() {
            match child {
                Node::Block(block) => block.import_matches(matches)?,
                Node::Value(leaf) if leaf.argument.is_some() => import_leaf(leaf, matches)?,
                _ => {}
            }
        }
        Ok(())
    }
}

fn collect_bound<'a>(block: &'a ConfigBlock, out: &mut Vec<&'a ConfigValue>) {
    for child in block.entries.values() {
        match child {
            Node::Value(leaf) if leaf.argument.is_some() => out.push(leaf),
            Node::Block(nested) => collect_bound(nested, out),
            _ => {}
        }
    }
}

/// The derived identity of a bound leaf: its long flag name and the id it
/// occupies in the parsed-argument namespace.
fn identity(leaf: &ConfigValue, spec: &ArgumentSpec) -> (String, String) {
    let flag = spec
        .flag
        .clone()
        .unwrap_or_else(|| leaf.info.name.replace(' ', "-"));
    let dest = spec.dest.clone().unwrap_or_else(|| flag.replace('-', "_"));
    (flag, dest)
}

fn disable_id(dest: &str) -> String {
    format!("disable_{dest}")
}

/// True when the leaf's current value makes a presence flag useless and a
/// `--disable` flag the meaningful polarity.
fn bool_is_on(leaf: &ConfigValue) -> bool {
    matches!(leaf.data, Value::Bool(true))
}

fn build_args(leaf: &ConfigValue) -> Vec<(Arg, Option<String>)> {
    let Some(spec) = &leaf.argument else {
        return Vec::new();
    };
    let (flag, dest) = identity(leaf, spec);
    let (heading, subcommand) = match &spec.group {
        None => (None, None),
        Some(ArgGroup::Heading(h)) => (Some(h.clone()), None),
        Some(ArgGroup::SubCommand(s)) => (None, Some(s.clone())),
        Some(ArgGroup::SubCommandHeading(s, h)) => (Some(h.clone()), Some(s.clone())),
    };
    let help = leaf.info.description.clone();

    let mut args = Vec::new();
    if leaf.domain.is_bool() {
        if bool_is_on(leaf) {
            let mut arg = Arg::new(disable_id(&dest))
                .long(format!("disable-{flag}"))
                .action(ArgAction::SetFalse);
            if let Some(help) = &help {
                arg = arg.help(format!("[DON'T] {help}"));
            }
            args.push((arg, subcommand.clone()));
        } else {
            let mut arg = Arg::new(dest.clone()).long(flag.clone()).action(ArgAction::SetTrue);
            if let Some(help) = &help {
                arg = arg.help(help.clone());
            }
            args.push((arg, subcommand.clone()));
            if spec.paired_disable {
                let mut off = Arg::new(disable_id(&dest))
                    .long(format!("disable-{flag}"))
                    .action(ArgAction::SetTrue);
                if let Some(help) = &help {
                    off = off.help(format!("[DON'T] {help}"));
                }
                args.push((off, subcommand.clone()));
            }
        }
    } else {
        let metavar = match &spec.dest {
            Some(dest) => dest.to_uppercase(),
            None => leaf.domain.type_label().to_string(),
        };
        let mut arg = Arg::new(dest)
            .long(flag)
            .action(ArgAction::Set)
            .value_name(metavar);
        if let Some(help) = &help {
            arg = arg.help(help.clone());
        }
        args.push((arg, subcommand));
    }

    if let Some(heading) = heading {
        for (arg, _) in args.iter_mut() {
            *arg = arg.clone().help_heading(heading.clone());
        }
    }
    args
}

fn import_leaf(leaf: &mut ConfigValue, matches: &mut ArgMatches) -> Result<(), ConfigError> {
    let Some(spec) = leaf.argument.clone() else {
        return Ok(());
    };
    let (_, dest) = identity(leaf, &spec);

    if leaf.domain.is_bool() {
        if let Some(enabled) = take_cmdline::<bool>(matches, &dest) {
            leaf.set_value(Value::Bool(enabled))?;
        }
        // Either disable polarity (the lone SetFalse flag or the paired
        // SetTrue one) occupies the disable id; its presence means false.
        if take_cmdline::<bool>(matches, &disable_id(&dest)).is_some() {
            leaf.set_value(Value::Bool(false))?;
        }
    } else if let Some(text) = take_cmdline::<String>(matches, &dest) {
        leaf.set_value(Value::String(text))?;
    }
    Ok(())
}

/// Remove `id` from the matches and return its value only when the user
/// passed it on the command line. Defaulted values are removed but not
/// returned; ids the matches never knew stay untouched.
fn take_cmdline<T: Clone + Send + Sync + 'static>(
    matches: &mut ArgMatches,
    id: &str,
) -> Option<T> {
    if !matches.try_contains_id(id).unwrap_or(false) {
        return None;
    }
    let from_cmdline = matches.value_source(id) == Some(ValueSource::CommandLine);
    let value = matches.try_remove_one::<T>(id).ok().flatten();
    if from_cmdline { value } else { None }
}
