//! Steps and sub-actions.
//!
//! A [`Step`] is a data record: a unique name, an optional progress message,
//! a [`Condition`] over [`Configuration`], and a [`StepBody`]. Nothing here
//! performs I/O; the application layer's `PipelineRunner` interprets the
//! records against the ports.
//!
//! ```text
//! Step
//! ├── condition: Always | When(fn(&Configuration) -> bool)
//! └── body
//!     ├── Actions(Vec<SubAction>)      Render | Command | Ensure | CopyIfMissing | Edit
//!     ├── Group(Vec<Step>)             nested steps gated by the same condition
//!     └── Branch { select, arms }      exactly one arm (or none) by equality
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::{
    entities::{
        common::RelativePath,
        configuration::Configuration,
        template::{RenderContext, TemplateId},
    },
    error::DomainError,
    value_objects::Choice,
};

/// Predicate deciding whether a step runs.
pub type Predicate = fn(&Configuration) -> bool;

/// Selector returning the option value a branch matches on.
pub type Selector = fn(&Configuration) -> Option<Selection>;

/// Gate evaluated once per step against the run's configuration.
#[derive(Clone, Copy)]
pub enum Condition {
    Always,
    When {
        /// Human-readable form, shown by `trestle list steps`.
        describe: &'static str,
        test: Predicate,
    },
}

impl Condition {
    pub const fn when(describe: &'static str, test: Predicate) -> Self {
        Self::When { describe, test }
    }

    pub fn holds(&self, config: &Configuration) -> bool {
        match self {
            Self::Always => true,
            Self::When { test, .. } => test(config),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::When { describe, .. } => describe,
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// One named, orderable unit of a pipeline.
#[derive(Debug, Clone)]
pub struct Step {
    name: &'static str,
    announce: Option<&'static str>,
    condition: Condition,
    body: StepBody,
}

impl Step {
    pub fn new(name: &'static str, body: StepBody) -> Self {
        Self {
            name,
            announce: None,
            condition: Condition::Always,
            body,
        }
    }

    /// Step made of sub-actions.
    pub fn actions(name: &'static str, actions: Vec<SubAction>) -> Self {
        Self::new(name, StepBody::Actions(actions))
    }

    /// Step whose nested steps share this step's condition.
    pub fn group(name: &'static str, steps: Vec<Step>) -> Self {
        Self::new(name, StepBody::Group(steps))
    }

    pub fn branch(name: &'static str, branch: Branch) -> Self {
        Self::new(name, StepBody::Branch(branch))
    }

    pub fn announce(mut self, message: &'static str) -> Self {
        self.announce = Some(message);
        self
    }

    pub fn when(mut self, describe: &'static str, test: Predicate) -> Self {
        self.condition = Condition::when(describe, test);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn announcement(&self) -> Option<&'static str> {
        self.announce
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn body(&self) -> &StepBody {
        &self.body
    }

    /// Whether this step runs for `config`.
    pub fn should_run(&self, config: &Configuration) -> bool {
        self.condition.holds(config)
    }
}

#[derive(Debug, Clone)]
pub enum StepBody {
    Actions(Vec<SubAction>),
    Group(Vec<Step>),
    Branch(Branch),
}

// ── Branching ────────────────────────────────────────────────────────────────

/// The value a branch selector extracted from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub value: String,
    /// `false` when the value is not a known variant of the option.
    pub recognized: bool,
}

impl Selection {
    pub fn of<T>(choice: &Choice<T>) -> Self
    where
        T: FromStr + fmt::Display,
    {
        Self {
            value: choice.key(),
            recognized: choice.is_recognized(),
        }
    }
}

/// Mutually exclusive arms keyed by an enumerated option value.
#[derive(Debug, Clone)]
pub struct Branch {
    option: &'static str,
    select: Selector,
    arms: Vec<BranchArm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchArm {
    pub value: &'static str,
    pub actions: Vec<SubAction>,
}

/// What a branch decided for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDecision<'a> {
    /// The option is unset.
    Unset,
    /// Recognized value with no dedicated arm.
    NoArm,
    /// Value outside the option's known set.
    Unrecognized,
    Arm(&'a BranchArm),
}

impl Branch {
    pub fn new(option: &'static str, select: Selector) -> Self {
        Self {
            option,
            select,
            arms: Vec::new(),
        }
    }

    pub fn arm(mut self, value: &'static str, actions: Vec<SubAction>) -> Self {
        self.arms.push(BranchArm { value, actions });
        self
    }

    pub fn option(&self) -> &'static str {
        self.option
    }

    pub fn arms(&self) -> &[BranchArm] {
        &self.arms
    }

    pub fn selection(&self, config: &Configuration) -> Option<Selection> {
        (self.select)(config)
    }

    /// Equality match of the selected value against the arm keys.
    pub fn decide(&self, config: &Configuration) -> BranchDecision<'_> {
        let Some(selection) = self.selection(config) else {
            return BranchDecision::Unset;
        };
        if let Some(arm) = self.arms.iter().find(|arm| arm.value == selection.value) {
            return BranchDecision::Arm(arm);
        }
        if selection.recognized {
            BranchDecision::NoArm
        } else {
            BranchDecision::Unrecognized
        }
    }
}

// ── Sub-actions ──────────────────────────────────────────────────────────────

/// Atomic effect within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubAction {
    /// Render template into `target`, creating parents, overwriting.
    Render {
        template: TemplateId,
        target: RelativePath,
        executable: bool,
    },
    /// Run a command in the project root; non-zero exit is fatal.
    Command(CommandSpec),
    /// Run `check`; only when it fails, run `install`.
    Ensure {
        check: CommandSpec,
        install: CommandSpec,
    },
    /// Copy `source` to `target` verbatim unless `target` exists.
    CopyIfMissing {
        source: RelativePath,
        target: RelativePath,
    },
    /// Text substitution on an existing file.
    Edit { path: RelativePath, edit: TextEdit },
}

impl SubAction {
    pub fn render(template: &str, target: &str) -> Self {
        Self::Render {
            template: TemplateId::new(template),
            target: RelativePath::new(target),
            executable: false,
        }
    }

    pub fn render_executable(template: &str, target: &str) -> Self {
        Self::Render {
            template: TemplateId::new(template),
            target: RelativePath::new(target),
            executable: true,
        }
    }

    pub fn command(spec: CommandSpec) -> Self {
        Self::Command(spec)
    }

    pub fn copy_if_missing(source: &str, target: &str) -> Self {
        Self::CopyIfMissing {
            source: RelativePath::new(source),
            target: RelativePath::new(target),
        }
    }

    pub fn edit(path: &str, edit: TextEdit) -> Self {
        Self::Edit {
            path: RelativePath::new(path),
            edit,
        }
    }

    /// Short label for logs and plans.
    pub fn describe(&self) -> String {
        match self {
            Self::Render { template, target, .. } => format!("render {template} -> {target}"),
            Self::Command(spec) => format!("run {spec}"),
            Self::Ensure { check, install } => format!("run {check} || {install}"),
            Self::CopyIfMissing { source, target } => format!("copy {source} -> {target} (if missing)"),
            Self::Edit { path, edit } => format!("edit {path} ({})", edit.kind()),
        }
    }
}

/// In-place text edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    /// Replace every occurrence of `find`.
    Replace { find: &'static str, replace: &'static str },
    /// Drop indented lines whose first non-blank text begins with `prefix`.
    /// Lines starting in column zero are kept.
    DropIndentedLines { prefix: &'static str },
    /// Insert text at the beginning of the file.
    Prepend(&'static str),
    /// Add text at the end of the file.
    Append(&'static str),
    /// Insert `text` right after the first `anchor`.
    InsertAfter { anchor: &'static str, text: &'static str },
}

impl TextEdit {
    pub fn apply(&self, content: &str) -> String {
        match self {
            Self::Replace { find, replace } => content.replace(find, replace),
            Self::DropIndentedLines { prefix } => {
                let mut out: String = content
                    .lines()
                    .filter(|line| {
                        let rest = line.trim_start();
                        !(rest.len() < line.len() && rest.starts_with(prefix))
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                if content.ends_with('\n') {
                    out.push('\n');
                }
                out
            }
            Self::Prepend(text) => {
                if content.starts_with(text) {
                    content.to_string()
                } else {
                    format!("{text}{content}")
                }
            }
            Self::Append(text) => {
                if content.ends_with(text) {
                    content.to_string()
                } else if content.is_empty() || content.ends_with('\n') {
                    format!("{content}{text}")
                } else {
                    format!("{content}\n{text}")
                }
            }
            Self::InsertAfter { anchor, text } => match content.find(anchor) {
                Some(at) if !content[at + anchor.len()..].starts_with(text) => {
                    let split = at + anchor.len();
                    format!("{}{text}{}", &content[..split], &content[split..])
                }
                _ => content.to_string(),
            },
        }
    }

    /// The text this edit needs to find, when `content` lacks it.
    pub fn missing_anchor(&self, content: &str) -> Option<&'static str> {
        match self {
            Self::Replace { find, replace }
                if !content.contains(find) && !content.contains(replace) =>
            {
                Some(*find)
            }
            Self::InsertAfter { anchor, .. } if !content.contains(anchor) => Some(*anchor),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Replace { .. } => "replace",
            Self::DropIndentedLines { .. } => "drop indented lines",
            Self::Prepend(_) => "prepend",
            Self::Append(_) => "append",
            Self::InsertAfter { .. } => "insert",
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────────────

/// One command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Passed as-is.
    Literal(&'static str),
    /// Rendered with the context, always exactly one argument.
    Template(&'static str),
    /// Rendered, then split like a shell would; may yield zero arguments.
    Words(&'static str),
}

/// Program plus argument shape for one call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: &'static str,
    args: Vec<Arg>,
}

impl CommandSpec {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    /// Literal arguments.
    pub fn args(mut self, args: &[&'static str]) -> Self {
        self.args.extend(args.iter().map(|a| Arg::Literal(a)));
        self
    }

    pub fn template(mut self, arg: &'static str) -> Self {
        self.args.push(Arg::Template(arg));
        self
    }

    pub fn words(mut self, arg: &'static str) -> Self {
        self.args.push(Arg::Words(arg));
        self
    }

    pub fn program(&self) -> &'static str {
        self.program
    }

    /// Resolve the argument shape into a concrete invocation.
    pub fn resolve(&self, ctx: &RenderContext, cwd: &Path) -> Result<Invocation, DomainError> {
        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg {
                Arg::Literal(value) => args.push((*value).to_string()),
                Arg::Template(template) => args.push(ctx.render(template)),
                Arg::Words(template) => {
                    let rendered = ctx.render(template);
                    let words = shell_words::split(&rendered).map_err(|e| {
                        DomainError::InvalidOption {
                            option: "command arguments",
                            reason: format!("{rendered}: {e}"),
                        }
                    })?;
                    args.extend(words);
                }
            }
        }

        Ok(Invocation {
            program: self.program.to_string(),
            args,
            cwd: cwd.to_path_buf(),
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in &self.args {
            match arg {
                Arg::Literal(v) | Arg::Template(v) | Arg::Words(v) => write!(f, " {v}")?,
            }
        }
        Ok(())
    }
}

/// A fully resolved command ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }

    /// Shell-quoted command line, e.g. `git commit -m 'Initial commit'`.
    pub fn command_line(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::configuration::ScaffoldOptions;

    fn config(f: impl FnOnce(&mut ScaffoldOptions)) -> Configuration {
        let mut options = ScaffoldOptions::new("shop");
        f(&mut options);
        Configuration::from_options(options).unwrap()
    }

    fn css_selection(config: &Configuration) -> Option<Selection> {
        config.css_framework().map(Selection::of)
    }

    #[test]
    fn command_resolution_splits_words_and_keeps_templates_whole() {
        let spec = CommandSpec::new("heroku")
            .args(&["create"])
            .template("{{STAGING_APP}}")
            .words("{{DEPLOY_FLAGS}}");

        let cfg = config(|o| o.deploy_flags = "--region eu --team 'web ops'".into());
        let inv = spec.resolve(&cfg.render_context(), Path::new("/w")).unwrap();

        assert_eq!(inv.program, "heroku");
        assert_eq!(
            inv.args,
            vec!["create", "shop-staging", "--region", "eu", "--team", "web ops"]
        );
        assert_eq!(inv.cwd, PathBuf::from("/w"));
    }

    #[test]
    fn empty_words_argument_yields_nothing() {
        let spec = CommandSpec::new("heroku").args(&["create"]).words("{{DEPLOY_FLAGS}}");
        let inv = spec
            .resolve(&config(|_| {}).render_context(), Path::new("."))
            .unwrap();
        assert_eq!(inv.args, vec!["create"]);
    }

    #[test]
    fn command_line_quotes_arguments() {
        let inv = Invocation::new("git", vec!["commit".into(), "-m".into(), "Initial commit".into()], ".");
        assert_eq!(inv.command_line(), "git commit -m 'Initial commit'");
    }

    #[test]
    fn branch_decides_by_equality() {
        let branch = Branch::new("css_framework", css_selection)
            .arm("bootstrap", vec![])
            .arm("foundation", vec![]);

        assert_eq!(branch.decide(&config(|_| {})), BranchDecision::Unset);
        assert!(matches!(
            branch.decide(&config(|o| o.css_framework = Some("bootstrap".into()))),
            BranchDecision::Arm(arm) if arm.value == "bootstrap"
        ));
        assert_eq!(
            branch.decide(&config(|o| o.css_framework = Some("bourbon".into()))),
            BranchDecision::NoArm
        );
        assert_eq!(
            branch.decide(&config(|o| o.css_framework = Some("material".into()))),
            BranchDecision::Unrecognized
        );
    }

    #[test]
    fn drop_lines_keeps_trailing_newline() {
        let edit = TextEdit::DropIndentedLines { prefix: "#" };
        let routes = "Rails.application.routes.draw do\n  # comment\nend\n";
        assert_eq!(edit.apply(routes), "Rails.application.routes.draw do\nend\n");
    }

    #[test]
    fn drop_lines_keeps_top_level_comments() {
        let edit = TextEdit::DropIndentedLines { prefix: "#" };
        let routes = "# frozen_string_literal: true\n\nRails.application.routes.draw do\n\t# tab\n  root \"home#show\"\nend\n";
        assert_eq!(
            edit.apply(routes),
            "# frozen_string_literal: true\n\nRails.application.routes.draw do\n  root \"home#show\"\nend\n"
        );
    }

    #[test]
    fn append_and_insert_are_not_doubled() {
        let append = TextEdit::Append("gem \"webpacker\"\n");
        let once = append.apply("gem \"rails\"");
        assert_eq!(once, "gem \"rails\"\ngem \"webpacker\"\n");
        assert_eq!(append.apply(&once), once);

        let insert = TextEdit::InsertAfter {
            anchor: "<head>\n",
            text: "  <%= tag %>\n",
        };
        let once = insert.apply("<head>\n</head>\n");
        assert_eq!(once, "<head>\n  <%= tag %>\n</head>\n");
        assert_eq!(insert.apply(&once), once);
    }

    #[test]
    fn missing_anchor_is_reported() {
        let replace = TextEdit::Replace {
            find: "perform_caching = false",
            replace: "perform_caching = true",
        };
        assert_eq!(replace.missing_anchor("x = 1\n"), Some("perform_caching = false"));
        assert_eq!(replace.missing_anchor("perform_caching = false\n"), None);
        assert_eq!(replace.missing_anchor("perform_caching = true\n"), None);
        assert_eq!(TextEdit::Prepend("x").missing_anchor(""), None);
    }

    #[test]
    fn prepend_is_not_doubled() {
        let edit = TextEdit::Prepend("require 'x'\n");
        let once = edit.apply("body\n");
        assert_eq!(edit.apply(&once), once);
    }

    #[test]
    fn condition_defaults_to_always() {
        let step = Step::actions("noop", vec![]);
        assert!(step.should_run(&config(|_| {})));
        assert_eq!(step.condition().describe(), "always");
    }
}
