//! Application context tying the engine to its stores.

use roshambo_engine::{GameEngine, Opponent, RoundReport};
use roshambo_store::{RecordStore, UserStore};
use roshambo_types::{
    account::Registration,
    config::SessionConfig,
    moves::Move,
    record::{MatchRecord, StatsSummary},
    AuthError, Result, RoshamboError,
};
use tracing::{info, warn};

/// One interactive session: a single engine, its record store and, when
/// logins are enabled, the user registry.
///
/// The UI layer holds this value and calls into it; nothing here is global.
pub struct GameSession<S, O>
where
    S: RecordStore,
    O: Opponent,
{
    engine: GameEngine,
    store: S,
    opponent: O,
    users: Option<UserStore>,
    active_user: Option<String>,
    config: SessionConfig,
}

impl<S, O> GameSession<S, O>
where
    S: RecordStore,
    O: Opponent,
{
    pub fn new(config: SessionConfig, store: S, opponent: O, users: Option<UserStore>) -> Self {
        Self {
            engine: GameEngine::new(),
            store,
            opponent,
            users,
            active_user: None,
            config,
        }
    }

    /// Loads the anonymous record when the store is not user-scoped.
    pub fn boot(&mut self) -> Result<()> {
        if self.store.requires_user() {
            info!("Session waiting for an active user");
            return Ok(());
        }
        self.engine = self.load_scope(None)?;
        Ok(())
    }

    /// True once rounds can be recorded.
    pub fn is_ready(&self) -> bool {
        !self.store.requires_user() || self.active_user.is_some()
    }

    /// Plays one round and persists the full state.
    ///
    /// Returns `Ok(None)` without touching any state when no user is active
    /// on a user-scoped store.
    pub fn play(&mut self, player: Move) -> Result<Option<RoundReport>> {
        if !self.is_ready() {
            warn!("Ignoring {} played before a user was selected", player);
            return Ok(None);
        }
        let report = self.engine.play(player, &mut self.opponent);
        info!(
            "Round {}: {} vs {} -> {:?}",
            self.engine.aggregate().total_games,
            player,
            report.computer,
            report.outcome
        );
        self.persist()?;
        Ok(Some(report))
    }

    /// Same as [`GameSession::play`] for raw UI input such as `"Rock"`.
    pub fn play_input(&mut self, input: &str) -> Result<Option<RoundReport>> {
        let player: Move = input.parse()?;
        self.play(player)
    }

    /// Switches the active user and rebuilds the engine from their history.
    ///
    /// On error the previous user and engine stay in place.
    pub fn set_active_user(&mut self, username: &str) -> Result<()> {
        let username = username.trim();
        let engine = self.load_scope(Some(username))?;
        self.active_user = Some(username.to_string());
        self.engine = engine;
        Ok(())
    }

    fn load_scope(&mut self, user: Option<&str>) -> Result<GameEngine> {
        let stored = self.store.load(user)?;
        if !stored.exists {
            info!("No saved record for {:?}; starting fresh", user);
            let engine = GameEngine::new();
            self.store
                .save_all(user, engine.aggregate(), engine.history())?;
            return Ok(engine);
        }

        let engine = GameEngine::from_history(stored.history);
        if *engine.aggregate() != stored.stats {
            warn!(
                "Stored stats for {:?} disagree with history ({:?} vs {:?}); using history",
                user,
                stored.stats,
                engine.aggregate()
            );
        }
        info!("Active record {:?}: {}", user, engine.score_line());
        Ok(engine)
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save_all(
            self.active_user.as_deref(),
            self.engine.aggregate(),
            self.engine.history(),
        )
    }

    pub fn register(&mut self, form: &Registration) -> Result<Result<(), AuthError>> {
        if let Err(err) = form.validate() {
            return Ok(Err(err));
        }
        self.users_mut()?
            .register(form.username.trim(), &form.password, form.email.trim())
    }

    /// Checks credentials and, on success, makes the user active.
    ///
    /// A failed record load leaves the session logged out.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Result<(), AuthError>> {
        let username = username.trim();
        if let Err(err) = self.users_mut()?.authenticate(username, password)? {
            return Ok(Err(err));
        }
        if let Err(err) = self.set_active_user(username) {
            self.logout();
            return Err(err);
        }
        Ok(Ok(()))
    }

    pub fn logout(&mut self) {
        if let Some(users) = self.users.as_mut() {
            users.logout();
        }
        if self.store.requires_user() {
            self.active_user = None;
            self.engine = GameEngine::new();
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.users
            .as_ref()
            .is_some_and(|users| users.is_authenticated())
    }

    pub fn current_user(&self) -> Option<&str> {
        self.active_user.as_deref()
    }

    fn users_mut(&mut self) -> Result<&mut UserStore> {
        self.users
            .as_mut()
            .ok_or_else(|| session_error("logins are disabled for this session"))
    }

    pub fn stats(&self) -> StatsSummary {
        self.engine.stats()
    }

    pub fn move_distribution(&self) -> Vec<(&'static str, u32)> {
        self.engine.move_distribution()
    }

    pub fn win_rate_trend(&self) -> &[f64] {
        self.engine.win_rate_trend()
    }

    /// Rows for the history view, newest first.
    pub fn recent_history(&self) -> Vec<&MatchRecord> {
        self.engine
            .recent_history(self.config.history_limit)
            .collect()
    }

    pub fn score_line(&self) -> String {
        self.engine.score_line()
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub fn session_error(message: impl Into<String>) -> RoshamboError {
    RoshamboError::Session(message.into())
}
