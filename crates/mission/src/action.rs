//! Scripted mission actions.
//!
//! An action is the body of an `on <trigger>` block. Timers hold two of them
//! (`on timeup`, `on reset`) and only ever go through the [`Action`] trait, so
//! tests and other hosts can plug in their own.
//!
//! ```text
//! on timeup
//! 	dialog "The signal from <planet> stops."
//! 	log "Listened to the <origin> relay for <jumps> jumps."
//! 	"relay heard" ++
//! 	payment
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::data_file::DataNode;
use crate::data_writer::DataWriter;
use crate::player::{Interface, PlayerState};

/// Mission context an action template is instantiated against.
#[derive(Debug, Clone, Copy)]
pub struct InstantiateContext<'a> {
    /// Text substitutions such as `<npc>` → `Kestrel`. Keys include the brackets.
    pub substitutions: &'a BTreeMap<String, String>,
    /// System the mission was offered in.
    pub origin: Option<&'a str>,
    /// Jumps from origin to destination.
    pub jumps: u32,
    /// Mission payment.
    pub payload: i64,
}

impl<'a> InstantiateContext<'a> {
    pub fn new(substitutions: &'a BTreeMap<String, String>) -> Self {
        Self {
            substitutions,
            origin: None,
            jumps: 0,
            payload: 0,
        }
    }

    /// Replace every known `<key>` in `text`. The caller's table wins over
    /// the built-in `<origin>`, `<jumps>` and `<payment>` keys.
    pub fn substitute(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (key, value) in self.substitutions {
            result = result.replace(key.as_str(), value);
        }
        result = result.replace("<origin>", self.origin.unwrap_or(""));
        result = result.replace("<jumps>", &self.jumps.to_string());
        result.replace("<payment>", &format!("{} credits", self.payload))
    }
}

/// A mission action as the timer sees it: loadable, savable, instantiable, runnable.
pub trait Action: Clone + fmt::Debug {
    /// Read the `on <trigger>` node.
    fn load(node: &DataNode) -> Self;
    /// Write the `on <trigger>` node and its body.
    fn save(&self, out: &mut DataWriter);
    /// Copy of this template with mission text filled in.
    fn instantiate(&self, context: &InstantiateContext<'_>) -> Self;
    fn execute(&self, player: &mut dyn PlayerState, ui: &mut dyn Interface);
}

/// One change to the player's conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionEdit {
    Assign(String, i64),
    Add(String, i64),
    Clear(String),
}

impl ConditionEdit {
    /// Parse `set c`, `clear c`, `c = v`, `c += v`, `c -= v`, `c ++`, `c --`.
    fn parse(node: &DataNode) -> Option<Self> {
        let key = node.token(0);
        match (key, node.token(1)) {
            ("set", name) if node.size() == 2 => Some(Self::Assign(name.to_string(), 1)),
            ("clear", name) if node.size() == 2 => Some(Self::Clear(name.to_string())),
            (_, "=") if node.size() == 3 => Some(Self::Assign(key.to_string(), node.value(2) as i64)),
            (_, "+=") if node.size() == 3 => Some(Self::Add(key.to_string(), node.value(2) as i64)),
            (_, "-=") if node.size() == 3 => {
                Some(Self::Add(key.to_string(), (node.value(2) as i64).saturating_neg()))
            }
            (_, "++") if node.size() == 2 => Some(Self::Add(key.to_string(), 1)),
            (_, "--") if node.size() == 2 => Some(Self::Add(key.to_string(), -1)),
            _ => None,
        }
    }

    fn save(&self, out: &mut DataWriter) {
        match self {
            Self::Assign(key, value) => out.write([key.as_str(), "=", &value.to_string()]),
            // i64::MIN has no positive counterpart, so it stays a `+=`.
            Self::Add(key, value) if *value >= 0 || *value == i64::MIN => {
                out.write([key.as_str(), "+=", &value.to_string()])
            }
            Self::Add(key, value) => out.write([key.as_str(), "-=", &(-value).to_string()]),
            Self::Clear(key) => out.write(["clear", key.as_str()]),
        }
    }

    fn apply(&self, player: &mut dyn PlayerState) {
        let conditions = player.conditions_mut();
        match self {
            Self::Assign(key, value) => conditions.set(key.clone(), *value),
            Self::Add(key, amount) => conditions.add(key.clone(), *amount),
            Self::Clear(key) => {
                conditions.erase(key);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ActionStep {
    Dialog(String),
    Log(String),
    Condition(ConditionEdit),
    /// `None` until instantiated, then the mission payload.
    Payment(Option<i64>),
    /// Lines this action does not understand, kept so saves round-trip.
    Unknown(DataNode),
}

/// The stock mission action: dialogs, log entries, condition edits, payment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionAction {
    trigger: String,
    steps: Vec<ActionStep>,
}

impl MissionAction {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            steps: Vec::new(),
        }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn with_condition(mut self, edit: ConditionEdit) -> Self {
        self.steps.push(ActionStep::Condition(edit));
        self
    }
}

fn joined_text(node: &DataNode) -> String {
    node.tokens()[1..].join(" ")
}

impl Action for MissionAction {
    fn load(node: &DataNode) -> Self {
        let mut action = Self::new(node.token(1));
        for child in node {
            let step = match child.token(0) {
                "dialog" if child.size() > 1 => ActionStep::Dialog(joined_text(child)),
                "log" if child.size() > 1 => ActionStep::Log(joined_text(child)),
                "payment" => ActionStep::Payment(child.is_number(1).then(|| child.value(1) as i64)),
                _ => match ConditionEdit::parse(child) {
                    Some(edit) => ActionStep::Condition(edit),
                    None => {
                        log::debug!("Keeping unrecognized action line {}: {}", child.line(), child);
                        ActionStep::Unknown(child.clone())
                    }
                },
            };
            action.steps.push(step);
        }
        action
    }

    fn save(&self, out: &mut DataWriter) {
        out.write(["on", self.trigger.as_str()]);
        out.begin_child();
        for step in &self.steps {
            match step {
                ActionStep::Dialog(text) => out.write(["dialog", text.as_str()]),
                ActionStep::Log(text) => out.write(["log", text.as_str()]),
                ActionStep::Condition(edit) => edit.save(out),
                ActionStep::Payment(Some(amount)) => out.write(["payment", &amount.to_string()]),
                ActionStep::Payment(None) => out.write(["payment"]),
                ActionStep::Unknown(node) => out.write_node(node),
            }
        }
        out.end_child();
    }

    fn instantiate(&self, context: &InstantiateContext<'_>) -> Self {
        let steps = self
            .steps
            .iter()
            .map(|step| match step {
                ActionStep::Dialog(text) => ActionStep::Dialog(context.substitute(text)),
                ActionStep::Log(text) => ActionStep::Log(context.substitute(text)),
                ActionStep::Payment(None) => ActionStep::Payment(Some(context.payload)),
                other => other.clone(),
            })
            .collect();
        Self {
            trigger: self.trigger.clone(),
            steps,
        }
    }

    fn execute(&self, player: &mut dyn PlayerState, ui: &mut dyn Interface) {
        for step in &self.steps {
            match step {
                ActionStep::Dialog(text) => ui.show_dialog(text),
                ActionStep::Log(text) => player.add_log_entry(text),
                ActionStep::Condition(edit) => edit.apply(player),
                ActionStep::Payment(amount) => player.add_credits(amount.unwrap_or(0)),
                ActionStep::Unknown(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_file::DataFile;
    use crate::player::{MessageLog, PlayerInfo};

    const BODY: &str = "on timeup\n\
                        \tdialog \"Hold position near <planet>.\"\n\
                        \tlog Waited at <origin> for <payment>.\n\
                        \tset \"relay heard\"\n\
                        \tvisits += 2\n\
                        \tvisits --\n\
                        \tpayment\n\
                        \tevent \"relay destroyed\"\n";

    fn load_body() -> MissionAction {
        MissionAction::load(&DataFile::parse(BODY).nodes()[0])
    }

    #[test]
    fn action_instantiates_text_and_payment() {
        let mut subs = BTreeMap::new();
        subs.insert("<planet>".to_string(), "Luna".to_string());
        let context = InstantiateContext {
            substitutions: &subs,
            origin: Some("Sol"),
            jumps: 2,
            payload: 800,
        };
        let action = load_body().instantiate(&context);

        let mut player = PlayerInfo::default();
        let mut ui = MessageLog::new();
        action.execute(&mut player, &mut ui);

        assert_eq!(ui.dialogs, vec!["Hold position near Luna.".to_string()]);
        assert_eq!(player.log, vec!["Waited at Sol for 800 credits.".to_string()]);
        assert_eq!(player.conditions.get("relay heard"), 1);
        assert_eq!(player.conditions.get("visits"), 1);
        assert_eq!(player.credits, 800);
    }

    #[test]
    fn action_template_is_unchanged_by_instantiate() {
        let template = load_body();
        let subs = BTreeMap::new();
        let _ = template.instantiate(&InstantiateContext::new(&subs));
        assert_eq!(template, load_body());
    }

    #[test]
    fn action_save_keeps_unknown_lines() {
        let action = load_body();
        let mut out = DataWriter::new();
        action.save(&mut out);
        assert!(out.as_str().contains("\tevent \"relay destroyed\"\n"));
        let reloaded = MissionAction::load(&DataFile::parse(out.as_str()).nodes()[0]);
        assert_eq!(reloaded, action);
    }

    #[test]
    fn condition_clear_erases() {
        let action = MissionAction::new("reset").with_condition(ConditionEdit::Clear("flag".into()));
        let mut player = PlayerInfo::default();
        player.conditions.set("flag", 3);
        action.execute(&mut player, &mut MessageLog::new());
        assert!(!player.conditions.has("flag"));
    }

    #[test]
    fn condition_edits_saturate_on_huge_values() {
        let action = MissionAction::load(
            &DataFile::parse("on timeup\n\tdebt -= -1e19\n\tloss += -1e19\n").nodes()[0],
        );
        let mut player = PlayerInfo::default();
        action.execute(&mut player, &mut MessageLog::new());
        assert_eq!(player.conditions.get("debt"), i64::MAX);
        assert_eq!(player.conditions.get("loss"), i64::MIN);

        let mut out = DataWriter::new();
        action.save(&mut out);
        let reloaded = MissionAction::load(&DataFile::parse(out.as_str()).nodes()[0]);
        assert_eq!(reloaded, action);
    }
}
