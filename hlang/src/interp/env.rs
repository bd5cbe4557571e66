//! Environment ("Memory") for variable bindings

use super::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared reference to an environment
pub type EnvRef = Rc<RefCell<Environment>>;

/// One scope of a lexical environment chain
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variable bindings in this scope
    bindings: HashMap<String, Value>,
    /// Enclosing scope
    parent: Option<EnvRef>,
    /// Outermost scope of the chain; `None` when this scope is the root
    root: Option<EnvRef>,
}

impl Environment {
    /// Create a new root (global) environment
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
            parent: None,
            root: None,
        }
    }

    /// Create a new environment enclosed by `parent`
    pub fn with_parent(parent: EnvRef) -> Self {
        let root = root_of(&parent);
        Environment {
            bindings: HashMap::new(),
            parent: Some(parent),
            root: Some(root),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this scope, shadowing any outer binding
    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look up a variable in the scope chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            Some(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            None
        }
    }

    /// Rebind `name` in the nearest scope that already has it.
    /// Hands the value back if no scope in the chain does.
    pub fn update(&mut self, name: &str, value: Value) -> Result<(), Value> {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            Ok(())
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().update(name, value)
        } else {
            Err(value)
        }
    }

    /// Rebind the nearest existing `name`, else create it in this scope
    pub fn set(&mut self, name: &str, value: Value) {
        if let Err(value) = self.update(name, value) {
            self.define(name.to_string(), value);
        }
    }

    /// Check if a variable exists in the scope chain
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name) || self.parent.as_ref().is_some_and(|p| p.borrow().contains(name))
    }

    /// Bindings of this scope only
    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }

    /// Every name visible from this scope (for suggestions)
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        if let Some(parent) = &self.parent {
            names.extend(parent.borrow().visible_names());
        }
        names
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a child environment from a parent reference
pub fn child_env(parent: &EnvRef) -> EnvRef {
    Environment::with_parent(Rc::clone(parent)).into_ref()
}

/// The root scope of the chain `env` belongs to
pub fn root_of(env: &EnvRef) -> EnvRef {
    match &env.borrow().root {
        Some(root) => Rc::clone(root),
        None => Rc::clone(env),
    }
}
