//! Toggle inputs and the SAT/UNSAT verdict projected from them.
//!
//! The verdict is a teaching aid that mirrors the results of the formal model:
//! the base axioms are satisfiable, and each heresy flag injects an axiom that
//! makes the set contradictory. Nothing here runs a solver.

use std::fmt;

/// One of the three doctrinal "breakers" the page lets the user switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Modalism,
    Tritheism,
    Subordination,
}

impl Flag {
    pub const ALL: [Flag; 3] = [Flag::Modalism, Flag::Tritheism, Flag::Subordination];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Flag::Modalism => "Modalism",
            Flag::Tritheism => "Tritheism",
            Flag::Subordination => "Subordinationism",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Flag::Modalism => "Force Father = Son. Violates distinctness -> contradiction.",
            Flag::Tritheism => "Introduce a second essence E2 != E. Violates unique essence.",
            Flag::Subordination => {
                "Deny an essential attribute to the Son. Violates attribute sharing."
            }
        }
    }

    /// Keyboard shortcut shown next to the toggle.
    #[must_use]
    pub const fn hotkey(self) -> char {
        match self {
            Flag::Modalism => '1',
            Flag::Tritheism => '2',
            Flag::Subordination => '3',
        }
    }

    #[must_use]
    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.hotkey() == c)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Sat,
    Unsat,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Verdict::Sat => "SAT",
            Verdict::Unsat => "UNSAT",
        }
    }

    /// Pill label used by the page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Sat => "SAT (consistent)",
            Verdict::Unsat => "UNSAT (contradiction)",
        }
    }

    #[must_use]
    pub const fn is_consistent(self) -> bool {
        matches!(self, Verdict::Sat)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three independent toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictInputs {
    pub modalism: bool,
    pub tritheism: bool,
    pub subordination: bool,
}

impl VerdictInputs {
    #[must_use]
    pub const fn new(modalism: bool, tritheism: bool, subordination: bool) -> Self {
        Self {
            modalism,
            tritheism,
            subordination,
        }
    }

    #[must_use]
    pub const fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Modalism => self.modalism,
            Flag::Tritheism => self.tritheism,
            Flag::Subordination => self.subordination,
        }
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Modalism => self.modalism = value,
            Flag::Tritheism => self.tritheism = value,
            Flag::Subordination => self.subordination = value,
        }
    }

    pub fn toggle(&mut self, flag: Flag) {
        self.set(flag, !self.get(flag));
    }

    /// UNSAT as soon as any breaker is on.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        if self.modalism || self.tritheism || self.subordination {
            Verdict::Unsat
        } else {
            Verdict::Sat
        }
    }
}
