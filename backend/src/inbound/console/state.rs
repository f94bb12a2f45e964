//! Console state machine.
//!
//! [`ConsoleState::apply`] is a pure reducer: it folds one [`ConsoleEvent`]
//! into the state and returns the [`ConsoleCommand`] to run, if any. While an
//! action is pending every user input is ignored, which is what keeps at most
//! one action outstanding.

use crate::domain::ports::{ActionOutcome, UserRecord};

/// Lifecycle of the most recent action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Which action a [`ConsoleCommand`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Create,
    Update,
    Delete,
}

/// Server action requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Create { name: String, email: String },
    Update { id: String, name: String, email: String },
    Delete { id: String },
}

impl ConsoleCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Create { .. } => CommandKind::Create,
            Self::Update { .. } => CommandKind::Update,
            Self::Delete { .. } => CommandKind::Delete,
        }
    }
}

/// Inputs to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    NameChanged(String),
    EmailChanged(String),
    EditRequested(UserRecord),
    CancelEdit,
    Submit,
    DeleteRequested(String),
    /// An action finished.
    Settled {
        kind: CommandKind,
        outcome: ActionOutcome<()>,
    },
    /// A fresh user list after the page was revalidated.
    Refreshed(Vec<UserRecord>),
}

/// Snapshot rendered by the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleState {
    pub users: Vec<UserRecord>,
    pub editing: Option<UserRecord>,
    pub name: String,
    pub email: String,
    pub request: RequestState,
}

impl ConsoleState {
    /// Idle console showing `users`.
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_pending()
    }

    pub fn error(&self) -> Option<&str> {
        self.request.error()
    }

    /// Fold `event` into the state.
    ///
    /// # Examples
    /// ```
    /// use user_admin::inbound::console::{ConsoleCommand, ConsoleEvent, ConsoleState};
    ///
    /// let mut state = ConsoleState::new(Vec::new());
    /// state.apply(ConsoleEvent::NameChanged("Ada".into()));
    /// state.apply(ConsoleEvent::EmailChanged("ada@example.com".into()));
    /// let command = state.apply(ConsoleEvent::Submit);
    /// assert_eq!(
    ///     command,
    ///     Some(ConsoleCommand::Create {
    ///         name: "Ada".into(),
    ///         email: "ada@example.com".into(),
    ///     })
    /// );
    /// assert!(state.is_pending());
    /// ```
    pub fn apply(&mut self, event: ConsoleEvent) -> Option<ConsoleCommand> {
        match event {
            ConsoleEvent::Settled { kind, outcome } => {
                self.settle(kind, outcome);
                None
            }
            ConsoleEvent::Refreshed(users) => {
                self.users = users;
                None
            }
            _ if self.is_pending() => None,
            ConsoleEvent::NameChanged(name) => {
                self.name = name;
                None
            }
            ConsoleEvent::EmailChanged(email) => {
                self.email = email;
                None
            }
            ConsoleEvent::EditRequested(user) => {
                self.name = user.name.clone();
                self.email = user.email.clone();
                self.editing = Some(user);
                None
            }
            ConsoleEvent::CancelEdit => {
                self.clear_form();
                None
            }
            ConsoleEvent::Submit => {
                self.request = RequestState::Submitting;
                let name = self.name.clone();
                let email = self.email.clone();
                Some(match &self.editing {
                    Some(user) => ConsoleCommand::Update {
                        id: user.id.clone(),
                        name,
                        email,
                    },
                    None => ConsoleCommand::Create { name, email },
                })
            }
            ConsoleEvent::DeleteRequested(id) => {
                self.request = RequestState::Submitting;
                Some(ConsoleCommand::Delete { id })
            }
        }
    }

    fn settle(&mut self, kind: CommandKind, outcome: ActionOutcome<()>) {
        // A settlement with nothing in flight is stale.
        if !self.is_pending() {
            return;
        }
        match outcome {
            ActionOutcome::Failed { error } => self.request = RequestState::Failed(error),
            ActionOutcome::Succeeded(()) => {
                self.request = RequestState::Succeeded;
                match kind {
                    CommandKind::Create => {
                        self.name.clear();
                        self.email.clear();
                    }
                    CommandKind::Update => self.clear_form(),
                    CommandKind::Delete => {}
                }
            }
        }
    }

    fn clear_form(&mut self) {
        self.editing = None;
        self.name.clear();
        self.email.clear();
    }
}
