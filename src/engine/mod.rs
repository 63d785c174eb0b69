//! The progression engine facade
//!
//! Each player's pets, ledger, achievements and session sit behind one
//! `Mutex`. The index maps below only locate that mutex: they are read,
//! released, and the player lock is taken afterwards. A thread holding a
//! player lock may write an index, never the other way round.
//!
//! Every operation validates before it mutates, so a poisoned lock still
//! guards consistent state and is recovered rather than propagated.

pub mod player;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::achievements::{
    AchievementDefinition, AchievementStatus, AchievementTracker, AchievementType,
};
use crate::actions::{AbsoluteProgress, ActionDefinition, ActionExecutor, ActionOutcome};
use crate::catalog::Catalog;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::EngineConfig;
use crate::core::error::{PetError, Result};
use crate::core::types::{PetId, PetType, PlayerId, SessionId, Timestamp};
use crate::ledger::{ItemDefinition, LedgerSnapshot, PlayerCounters, ProgressionLedger};
use crate::minigame::{
    GameInput, GameSettlement, GameType, InputOutcome, MiniGameSession, MiniGameSessionManager,
};
use crate::pet::Pet;

use player::{PlayerRewards, PlayerState};

/// Longest accepted pet name, in characters
pub const MAX_PET_NAME_LEN: usize = 32;

/// Result of one mini-game input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTurn {
    pub outcome: InputOutcome,
    /// The session after the input
    pub session: MiniGameSession,
    /// Present once the session has finished
    pub settlement: Option<GameSettlement>,
    pub newly_unlocked: Vec<AchievementDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub item: ItemDefinition,
    pub coins_left: u32,
    pub newly_unlocked: Vec<AchievementDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUse {
    pub message: String,
    pub pet: Pet,
    pub remaining: u32,
}

type SharedPlayer = Arc<Mutex<PlayerState>>;

pub struct PetEngine {
    config: EngineConfig,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    games: MiniGameSessionManager,
    players: RwLock<AHashMap<PlayerId, SharedPlayer>>,
    pet_index: RwLock<AHashMap<PetId, PlayerId>>,
    session_index: RwLock<AHashMap<SessionId, PlayerId>>,
    /// Seeds each new player's generator
    seeds: Mutex<ChaCha8Rng>,
}

fn lock(player: &Mutex<PlayerState>) -> MutexGuard<'_, PlayerState> {
    player.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PetEngine {
    pub fn new(config: EngineConfig, catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;
        for item in &config.starting_items {
            if catalog.item(item).is_none() {
                return Err(PetError::Config(format!("unknown starting item '{}'", item)));
            }
        }

        let master = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        tracing::info!(
            seed = ?config.seed,
            actions = catalog.actions().len(),
            games = catalog.games().len(),
            "engine ready"
        );

        Ok(Self {
            config,
            catalog,
            clock,
            games: MiniGameSessionManager::new(),
            players: RwLock::new(AHashMap::new()),
            pet_index: RwLock::new(AHashMap::new()),
            session_index: RwLock::new(AHashMap::new()),
            seeds: Mutex::new(master),
        })
    }

    /// Default config, embedded catalog, system clock
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            EngineConfig::default(),
            Arc::new(Catalog::embedded()?),
            Arc::new(SystemClock),
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // === LOOKUP ===

    fn player(&self, player: &PlayerId) -> Option<SharedPlayer> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(player)
            .cloned()
    }

    fn player_or_insert(&self, player: &PlayerId) -> SharedPlayer {
        if let Some(existing) = self.player(player) {
            return existing;
        }
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        players
            .entry(player.clone())
            .or_insert_with(|| {
                let seed = self.seeds.lock().unwrap_or_else(PoisonError::into_inner).gen();
                Arc::new(Mutex::new(PlayerState::new(
                    player.clone(),
                    ChaCha8Rng::seed_from_u64(seed),
                )))
            })
            .clone()
    }

    fn owner_of_pet(&self, pet_id: PetId) -> Result<PlayerId> {
        self.pet_index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&pet_id)
            .cloned()
            .ok_or_else(|| PetError::not_found("pet", pet_id))
    }

    fn owner_of_session(&self, session_id: SessionId) -> Result<PlayerId> {
        self.session_index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session_id)
            .cloned()
            .ok_or_else(|| PetError::not_found("session", session_id))
    }

    /// Run `f` under the lock of the player owning `pet_id`. The pet is
    /// looked up again under the lock in case it was deleted meanwhile.
    fn with_pet_owner<T>(
        &self,
        pet_id: PetId,
        f: impl FnOnce(&mut PlayerState) -> Result<T>,
    ) -> Result<T> {
        let owner = self.owner_of_pet(pet_id)?;
        let shared = self
            .player(&owner)
            .ok_or_else(|| PetError::not_found("pet", pet_id))?;
        let mut state = lock(&shared);
        if state.pet(pet_id).is_none() {
            return Err(PetError::not_found("pet", pet_id));
        }
        f(&mut state)
    }

    /// Run `f` under the lock of the player owning `session_id`
    fn with_session_owner<T>(
        &self,
        session_id: SessionId,
        f: impl FnOnce(&mut PlayerState) -> Result<T>,
    ) -> Result<T> {
        let owner = self.owner_of_session(session_id)?;
        let shared = self
            .player(&owner)
            .ok_or_else(|| PetError::not_found("session", session_id))?;
        let mut state = lock(&shared);
        if state.session.as_ref().map(|s| s.id) != Some(session_id) {
            return Err(PetError::not_found("session", session_id));
        }
        f(&mut state)
    }

    fn with_player<T>(
        &self,
        player: &PlayerId,
        f: impl FnOnce(&mut PlayerState) -> Result<T>,
    ) -> Result<T> {
        let shared = self
            .player(player)
            .ok_or_else(|| PetError::not_found("player", player))?;
        let mut state = lock(&shared);
        f(&mut state)
    }

    // === PETS ===

    /// Adopt a pet. A player's first pet comes with the starting grant.
    pub fn create_pet(
        &self,
        player: &PlayerId,
        name: &str,
        pet_type: PetType,
        customization: serde_json::Value,
    ) -> Result<Pet> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PetError::invalid_input("pet name must not be empty"));
        }
        if name.chars().count() > MAX_PET_NAME_LEN {
            return Err(PetError::invalid_input(format!(
                "pet name must be at most {} characters",
                MAX_PET_NAME_LEN
            )));
        }

        let now = self.now();
        let shared = self.player_or_insert(player);
        let mut state = lock(&shared);

        if state.pets.is_empty() {
            state.ledger.credit(self.config.starting_coins);
            for item in &self.config.starting_items {
                state.ledger.add_item(item, 1);
            }
        }

        let pet = Pet::new(player.clone(), name, pet_type, customization, now);
        state.pets.push(pet.clone());
        self.pet_index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pet.id, player.clone());

        tracing::info!(player = %player, pet = %pet.id, name = %pet.name, ?pet_type, "pet adopted");
        Ok(pet)
    }

    /// The pet as it is now, decay included. Does not write.
    pub fn get_pet(&self, pet_id: PetId) -> Result<Pet> {
        let now = self.now();
        self.with_pet_owner(pet_id, |state| {
            let pet = state
                .pet(pet_id)
                .ok_or_else(|| PetError::not_found("pet", pet_id))?;
            Ok(pet.view_at(now, &self.config.decay))
        })
    }

    /// All of a player's pets in adoption order, decay included
    pub fn pets_of(&self, player: &PlayerId) -> Vec<Pet> {
        let Some(shared) = self.player(player) else {
            return Vec::new();
        };
        let now = self.now();
        let state = lock(&shared);
        state
            .pets
            .iter()
            .map(|p| p.view_at(now, &self.config.decay))
            .collect()
    }

    /// Remove a pet. Its running game is abandoned; if it was the last pet
    /// the player's progression is cleared too.
    pub fn delete_pet(&self, pet_id: PetId) -> Result<()> {
        self.with_pet_owner(pet_id, |state| {
            let index = state
                .pet_index(pet_id)
                .ok_or_else(|| PetError::not_found("pet", pet_id))?;
            state.pets.remove(index);

            let mut sessions = self
                .session_index
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if state.session.as_ref().is_some_and(|s| s.pet == pet_id) {
                if let Some(session) = state.session.take() {
                    sessions.remove(&session.id);
                    tracing::info!(session = %session.id, "session abandoned with its pet");
                }
            }
            if state.pets.is_empty() {
                if let Some(session) = state.session.take() {
                    sessions.remove(&session.id);
                }
                state.reset_progression();
            }
            drop(sessions);

            self.pet_index
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&pet_id);
            tracing::info!(player = %state.player, pet = %pet_id, "pet removed");
            Ok(())
        })
    }

    // === ACTIONS ===

    pub fn execute_action(&self, pet_id: PetId, action: &str) -> Result<ActionOutcome> {
        let now = self.now();
        self.with_pet_owner(pet_id, |state| {
            ActionExecutor::new(&self.catalog, &self.config).execute(state, pet_id, action, now)
        })
    }

    /// Actions that would pass their checks right now
    pub fn available_actions(&self, pet_id: PetId) -> Result<Vec<ActionDefinition>> {
        let pet = self.get_pet(pet_id)?;
        Ok(ActionExecutor::new(&self.catalog, &self.config)
            .available_actions(&pet)
            .into_iter()
            .cloned()
            .collect())
    }

    // === MINI-GAMES ===

    /// Start a game for the player's primary pet
    pub fn start_minigame(&self, player: &PlayerId, game: GameType) -> Result<MiniGameSession> {
        let definition = self
            .catalog
            .game(game)
            .ok_or_else(|| PetError::not_found("game", game.as_str()))?;
        let now = self.now();

        self.with_player(player, |state| {
            if let Some(active) = state.active_session() {
                return Err(PetError::precondition(format!(
                    "a {} game is already in progress",
                    active.game_type.as_str()
                )));
            }
            let pet = state
                .primary_pet()
                .ok_or_else(|| PetError::precondition("adopt a pet first"))?
                .view_at(now, &self.config.decay);
            if pet.is_asleep {
                return Err(PetError::precondition(format!("{} is asleep", pet.name)));
            }
            if pet.stats.energy() < self.config.min_game_energy {
                return Err(PetError::precondition(format!("{} is too tired to play", pet.name)));
            }

            let session =
                self.games
                    .start(state.player.clone(), pet.id, definition, now, &mut state.rng)?;

            let mut sessions = self
                .session_index
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            state.session = Some(session.clone());
            sessions.insert(session.id, state.player.clone());
            state.counters.games_played += 1;

            tracing::info!(player = %state.player, session = %session.id, game = game.as_str(), "game started");
            Ok(session)
        })
    }

    /// Feed one input to a session; pays out when it finishes
    pub fn submit_game_input(&self, session_id: SessionId, input: &GameInput) -> Result<GameTurn> {
        let now = self.now();
        self.with_session_owner(session_id, |state| {
            let PlayerState { session, rng, .. } = &mut *state;
            let Some(session) = session.as_mut() else {
                return Err(PetError::not_found("session", session_id));
            };
            let outcome = self.games.process_input(session, input, now, rng)?;

            if outcome.finished.is_none() {
                let session = session.clone();
                return Ok(GameTurn { outcome, session, settlement: None, newly_unlocked: Vec::new() });
            }

            let (settlement, newly_unlocked) = self.settle(state, now)?;
            let session = state
                .session
                .take()
                .ok_or_else(|| PetError::not_found("session", session_id))?;
            self.session_index
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&session.id);
            tracing::debug!(session = %session.id, state = ?session.state(), "session closed");
            Ok(GameTurn { outcome, session, settlement, newly_unlocked })
        })
    }

    /// Pay out the player's finished session to its pet
    fn settle(
        &self,
        state: &mut PlayerState,
        now: Timestamp,
    ) -> Result<(Option<GameSettlement>, Vec<AchievementDefinition>)> {
        let PlayerState { session, pets, ledger, achievements, counters, .. } = &mut *state;
        let Some(session) = session.as_ref() else {
            return Ok((None, Vec::new()));
        };
        let definition = self
            .catalog
            .game(session.game_type)
            .ok_or_else(|| PetError::not_found("game", session.game_type.as_str()))?;

        let pet = pets.iter_mut().find(|p| p.id == session.pet);
        let mut newly_unlocked = Vec::new();
        let settlement = match pet {
            Some(pet) => {
                pet.materialize(now, &self.config.decay);
                let settlement = {
                    let mut sink = PlayerRewards::new(&mut *ledger, Some(&mut pet.stats));
                    let settlement = self.games.settle(session, definition, &mut sink);
                    if settlement.success {
                        counters.games_won += 1;
                        newly_unlocked.extend(achievements.increment(
                            self.catalog.achievements(),
                            AchievementType::GamesWon,
                            1,
                            now,
                            &mut sink,
                        ));
                    }
                    settlement
                };
                let absolute = AbsoluteProgress::of(pet, now);
                let mut sink = PlayerRewards::new(&mut *ledger, Some(&mut pet.stats));
                newly_unlocked.extend(absolute.record(
                    achievements,
                    self.catalog.achievements(),
                    now,
                    &mut sink,
                ));
                settlement
            }
            None => {
                let mut sink = PlayerRewards::new(&mut *ledger, None);
                self.games.settle(session, definition, &mut sink)
            }
        };

        Ok((Some(settlement), newly_unlocked))
    }

    pub fn pause_game(&self, session_id: SessionId) -> Result<MiniGameSession> {
        self.with_session_owner(session_id, |state| {
            let session = state
                .session
                .as_mut()
                .ok_or_else(|| PetError::not_found("session", session_id))?;
            session.pause()?;
            Ok(session.clone())
        })
    }

    pub fn resume_game(&self, session_id: SessionId) -> Result<MiniGameSession> {
        self.with_session_owner(session_id, |state| {
            let session = state
                .session
                .as_mut()
                .ok_or_else(|| PetError::not_found("session", session_id))?;
            session.resume()?;
            Ok(session.clone())
        })
    }

    /// The player's unfinished session, if any
    pub fn active_session(&self, player: &PlayerId) -> Option<MiniGameSession> {
        let shared = self.player(player)?;
        let state = lock(&shared);
        state.active_session().cloned()
    }

    /// A running session; finished sessions are gone
    pub fn session(&self, session_id: SessionId) -> Result<MiniGameSession> {
        self.with_session_owner(session_id, |state| {
            state
                .session
                .clone()
                .ok_or_else(|| PetError::not_found("session", session_id))
        })
    }

    // === PROGRESSION ===

    /// Every achievement with this player's progress; unknown players read
    /// as all-zero
    pub fn get_achievements(&self, player: &PlayerId) -> Vec<AchievementStatus> {
        match self.player(player) {
            Some(shared) => lock(&shared).achievements.statuses(self.catalog.achievements()),
            None => AchievementTracker::new().statuses(self.catalog.achievements()),
        }
    }

    pub fn get_ledger(&self, player: &PlayerId) -> LedgerSnapshot {
        match self.player(player) {
            Some(shared) => lock(&shared).ledger.snapshot(),
            None => ProgressionLedger::new().snapshot(),
        }
    }

    pub fn player_counters(&self, player: &PlayerId) -> PlayerCounters {
        self.player(player)
            .map(|shared| lock(&shared).counters.clone())
            .unwrap_or_default()
    }

    /// Titles earned from unlocked achievements
    pub fn titles(&self, player: &PlayerId) -> Vec<String> {
        self.player(player)
            .map(|shared| lock(&shared).achievements.titles(self.catalog.achievements()))
            .unwrap_or_default()
    }

    // === SHOP ===

    pub fn shop_items(&self) -> Vec<ItemDefinition> {
        self.catalog.shop_items().into_iter().cloned().collect()
    }

    pub fn buy_item(&self, player: &PlayerId, item_id: &str) -> Result<Purchase> {
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| PetError::not_found("item", item_id))?;
        if !item.unlocked {
            return Err(PetError::precondition(format!("{} is not for sale yet", item.name)));
        }
        let now = self.now();

        self.with_player(player, |state| {
            state.ledger.debit(item.cost)?;
            state.ledger.add_item(&item.id, 1);
            state.counters.items_bought += 1;

            let newly_unlocked = {
                let PlayerState { pets, ledger, achievements, .. } = &mut *state;
                let mut sink = PlayerRewards::new(ledger, pets.first_mut().map(|p| &mut p.stats));
                achievements.increment(
                    self.catalog.achievements(),
                    AchievementType::ItemsBought,
                    1,
                    now,
                    &mut sink,
                )
            };

            tracing::info!(player = %state.player, item = %item.id, cost = item.cost, "item bought");
            Ok(Purchase {
                item: item.clone(),
                coins_left: state.ledger.coins(),
                newly_unlocked,
            })
        })
    }

    /// Use one owned item on a pet
    pub fn use_item(&self, pet_id: PetId, item_id: &str) -> Result<ItemUse> {
        let item = self
            .catalog
            .item(item_id)
            .ok_or_else(|| PetError::not_found("item", item_id))?;
        let now = self.now();

        self.with_pet_owner(pet_id, |state| {
            if !state.ledger.has_item(&item.id) {
                return Err(PetError::precondition(format!("you have no {}", item.name)));
            }
            let index = state
                .pet_index(pet_id)
                .ok_or_else(|| PetError::not_found("pet", pet_id))?;

            let mut pet = state.pets[index].clone();
            pet.materialize(now, &self.config.decay);
            if !item.usable_on(&pet) {
                return Err(PetError::precondition(format!(
                    "{} doesn't need {} right now",
                    pet.name, item.name
                )));
            }

            state.ledger.remove_item(&item.id, 1)?;
            item.apply_to(&mut pet);
            state.pets[index] = pet.clone();

            tracing::debug!(pet = %pet_id, item = %item.id, "item used");
            Ok(ItemUse {
                message: item.use_message(&pet.name),
                remaining: state.ledger.quantity(&item.id),
                pet,
            })
        })
    }
}
