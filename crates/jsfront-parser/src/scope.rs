//! Lexical context tracking.
//!
//! The parser keeps a stack of [`ScopeFrame`]s: one per program, function,
//! arrow, block, class and static block. Each frame records the flags that
//! decide what `yield`, `await`, `super`, `new.target` and `return` mean
//! inside it, whether it is strict, which names it declares, and (for
//! function-like frames) the enclosing statement labels.

use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};

bitflags! {
    /// What kind of construct opened a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScopeFlags: u16 {
        const TOP                = 1 << 0;
        const FUNCTION           = 1 << 1;
        const ASYNC              = 1 << 2;
        const GENERATOR          = 1 << 3;
        const ARROW              = 1 << 4;
        /// `catch (e)` with a plain identifier parameter.
        const SIMPLE_CATCH       = 1 << 5;
        /// `super.x` allowed.
        const SUPER              = 1 << 6;
        /// `super()` allowed.
        const DIRECT_SUPER       = 1 << 7;
        const CLASS_STATIC_BLOCK = 1 << 8;
        const CLASS_FIELD_INIT   = 1 << 9;
        /// Class body: strict, no own bindings.
        const CLASS              = 1 << 10;

        /// Frames that own `var` declarations and labels.
        const VAR = Self::TOP.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS_STATIC_BLOCK.bits()
            | Self::CLASS_FIELD_INIT.bits();
    }
}

/// How a name is being bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Lexical,
    Function,
    SimpleCatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Loop,
    Switch,
    Plain,
}

/// An entry of the label set. Unnamed entries stand for enclosing loops and
/// switches, which is what unlabeled `break`/`continue` look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: Option<String>,
    pub kind: LabelKind,
    pub statement_start: u32,
}

#[derive(Debug, Default)]
pub struct ScopeFrame {
    pub flags: ScopeFlags,
    pub strict: bool,
    pub var: FxHashSet<String>,
    pub lexical: FxHashSet<String>,
    pub functions: FxHashSet<String>,
    catch_param: Option<String>,
    pub labels: Vec<Label>,
}

impl ScopeFrame {
    fn new(flags: ScopeFlags, strict: bool) -> Self {
        Self {
            flags,
            strict,
            ..Self::default()
        }
    }

    fn is_var(&self) -> bool {
        self.flags.intersects(ScopeFlags::VAR)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.var.contains(name) || self.lexical.contains(name) || self.functions.contains(name)
    }
}

/// The stack of frames for one parse.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
    module: bool,
}

impl ScopeStack {
    pub fn new(module: bool) -> Self {
        Self {
            frames: Vec::new(),
            module,
        }
    }

    /// Push a frame. Strictness is inherited; class bodies are always strict.
    pub fn enter(&mut self, flags: ScopeFlags) {
        let strict = flags.contains(ScopeFlags::CLASS) || self.frames.last().is_some_and(|f| f.strict);
        self.frames.push(ScopeFrame::new(flags, strict));
    }

    pub fn enter_strict(&mut self, flags: ScopeFlags, strict: bool) {
        self.frames.push(ScopeFrame::new(flags, strict));
    }

    pub fn exit(&mut self) -> Option<ScopeFrame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn root(&self) -> Option<&ScopeFrame> {
        self.frames.first()
    }

    pub fn strict(&self) -> bool {
        self.frames.last().is_some_and(|f| f.strict)
    }

    /// Mark the current frame strict (a `"use strict"` directive).
    pub fn set_strict(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.strict = true;
        }
    }

    pub fn current(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    fn current_var(&self) -> Option<&ScopeFrame> {
        self.frames.iter().rev().find(|f| f.is_var())
    }

    fn current_var_mut(&mut self) -> Option<&mut ScopeFrame> {
        self.frames.iter_mut().rev().find(|f| f.is_var())
    }

    /// Nearest frame that binds `this`: any var frame except arrows.
    fn current_this(&self) -> Option<&ScopeFrame> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.is_var() && !f.flags.contains(ScopeFlags::ARROW))
    }

    fn var_flags(&self) -> ScopeFlags {
        self.current_var().map_or(ScopeFlags::empty(), |f| f.flags)
    }

    pub fn in_function(&self) -> bool {
        self.var_flags().contains(ScopeFlags::FUNCTION)
    }

    pub fn in_generator(&self) -> bool {
        let flags = self.var_flags();
        flags.contains(ScopeFlags::GENERATOR) && !flags.contains(ScopeFlags::CLASS_FIELD_INIT)
    }

    pub fn in_async(&self) -> bool {
        let flags = self.var_flags();
        flags.contains(ScopeFlags::ASYNC) && !flags.contains(ScopeFlags::CLASS_FIELD_INIT)
    }

    /// Whether `await` is an operator here.
    pub fn can_await(&self) -> bool {
        for frame in self.frames.iter().rev() {
            if frame
                .flags
                .intersects(ScopeFlags::CLASS_STATIC_BLOCK | ScopeFlags::CLASS_FIELD_INIT)
            {
                return false;
            }
            if frame.flags.contains(ScopeFlags::FUNCTION) {
                return frame.flags.contains(ScopeFlags::ASYNC);
            }
        }
        self.module
    }

    pub fn allow_super(&self) -> bool {
        self.current_this().is_some_and(|f| {
            f.flags
                .intersects(ScopeFlags::SUPER | ScopeFlags::CLASS_FIELD_INIT)
        })
    }

    pub fn allow_direct_super(&self) -> bool {
        self.current_this()
            .is_some_and(|f| f.flags.contains(ScopeFlags::DIRECT_SUPER))
    }

    pub fn allow_new_target(&self) -> bool {
        self.frames.iter().rev().any(|f| {
            f.flags
                .intersects(ScopeFlags::CLASS_STATIC_BLOCK | ScopeFlags::CLASS_FIELD_INIT)
                || (f.flags.contains(ScopeFlags::FUNCTION) && !f.flags.contains(ScopeFlags::ARROW))
        })
    }

    pub fn in_class_static_block(&self) -> bool {
        self.var_flags().contains(ScopeFlags::CLASS_STATIC_BLOCK)
    }

    pub fn in_class_field_init(&self) -> bool {
        self.current_this()
            .is_some_and(|f| f.flags.contains(ScopeFlags::CLASS_FIELD_INIT))
    }

    fn treats_functions_as_var(&self, frame: &ScopeFrame) -> bool {
        frame.flags.contains(ScopeFlags::FUNCTION)
            || (!self.module && frame.flags.contains(ScopeFlags::TOP))
    }

    /// Whether a function declared in the current frame binds like `var`.
    pub fn functions_act_as_var(&self) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| self.treats_functions_as_var(frame))
    }

    /// Record a binding. Returns `false` when it collides with an existing
    /// declaration.
    pub fn declare(&mut self, name: &str, kind: BindingKind) -> bool {
        let depth = self.frames.len();
        if depth == 0 {
            return true;
        }
        self.declare_in(depth - 1, name, kind)
    }

    /// Record a binding in the frame enclosing the current class body.
    pub fn declare_outside_class(&mut self, name: &str, kind: BindingKind) -> bool {
        let index = self
            .frames
            .iter()
            .rposition(|f| f.flags.contains(ScopeFlags::CLASS))
            .unwrap_or(self.frames.len());
        match index.checked_sub(1) {
            Some(index) => self.declare_in(index, name, kind),
            None => true,
        }
    }

    fn declare_in(&mut self, index: usize, name: &str, kind: BindingKind) -> bool {
        match kind {
            BindingKind::Lexical => {
                let frame = &mut self.frames[index];
                let clash = frame.declares(name);
                frame.lexical.insert(name.to_string());
                !clash
            }
            BindingKind::SimpleCatch => {
                let frame = &mut self.frames[index];
                frame.lexical.insert(name.to_string());
                frame.catch_param = Some(name.to_string());
                true
            }
            BindingKind::Function => {
                let as_var = self.treats_functions_as_var(&self.frames[index]);
                let frame = &mut self.frames[index];
                let clash = if as_var {
                    frame.lexical.contains(name)
                } else {
                    frame.lexical.contains(name) || frame.var.contains(name)
                };
                frame.functions.insert(name.to_string());
                !clash
            }
            BindingKind::Var => {
                for i in (0..=index).rev() {
                    let as_var = self.treats_functions_as_var(&self.frames[i]);
                    let frame = &mut self.frames[i];
                    let shadowed_catch = frame.flags.contains(ScopeFlags::SIMPLE_CATCH)
                        && frame.catch_param.as_deref() == Some(name);
                    if (frame.lexical.contains(name) && !shadowed_catch)
                        || (!as_var && frame.functions.contains(name))
                    {
                        return false;
                    }
                    frame.var.insert(name.to_string());
                    if frame.is_var() {
                        break;
                    }
                }
                true
            }
        }
    }

    // === Labels ===

    pub fn labels(&self) -> &[Label] {
        self.current_var().map_or(&[][..], |f| f.labels.as_slice())
    }

    pub fn labels_mut(&mut self) -> Option<&mut Vec<Label>> {
        self.current_var_mut().map(|f| &mut f.labels)
    }

    pub fn push_label(&mut self, label: Label) {
        if let Some(labels) = self.labels_mut() {
            labels.push(label);
        }
    }

    pub fn pop_label(&mut self) {
        if let Some(labels) = self.labels_mut() {
            labels.pop();
        }
    }

    pub fn in_iteration(&self) -> bool {
        self.labels().iter().any(|l| l.name.is_none() && l.kind == LabelKind::Loop)
    }

    pub fn in_switch(&self) -> bool {
        self.labels().iter().any(|l| l.name.is_none() && l.kind == LabelKind::Switch)
    }
}

/// Private names of one class body.
#[derive(Debug, Default)]
pub struct PrivateNameScope {
    declared: FxHashMap<String, PrivateSlot>,
    /// Names referenced before (or without) their declaration, with offsets.
    pub used: Vec<(String, u32)>,
}

/// What a private name has been declared as so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateSlot {
    Field,
    Getter { is_static: bool },
    Setter { is_static: bool },
    /// A getter and setter pair.
    Accessor,
}

impl PrivateNameScope {
    /// Declare `#name`. Returns `false` on a conflicting redeclaration; a
    /// getter and a setter with the same staticness may share a name.
    pub fn declare(&mut self, name: &str, slot: PrivateSlot) -> bool {
        match self.declared.get(name).copied() {
            None => {
                self.declared.insert(name.to_string(), slot);
                true
            }
            Some(PrivateSlot::Getter { is_static: a }) if slot == (PrivateSlot::Setter { is_static: a }) => {
                self.declared.insert(name.to_string(), PrivateSlot::Accessor);
                true
            }
            Some(PrivateSlot::Setter { is_static: a }) if slot == (PrivateSlot::Getter { is_static: a }) => {
                self.declared.insert(name.to_string(), PrivateSlot::Accessor);
                true
            }
            Some(_) => false,
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }
}
