//! Shared fixtures for unit tests.

use std::collections::BTreeMap;

use crate::ai::{self, AiAction, TurnMemory};
use crate::config::CombatConfig;
use crate::engine::{TurnAdvance, TurnError, build_turn_order, try_end_turn};
use crate::env::{CombatEnv, LootEntry, MonsterTemplate, StaticGrid};
use crate::events::EventLog;
use crate::movement;
use crate::spell::{
    self, CastError, CastReport, Element, SpellDefinition, SpellId, SpellPreview,
};
use crate::state::{
    ActorStats, CombatState, Combatant, EncounterId, EntityId, Position, Role, TemplateId,
};

/// A 10x10 open arena with the player at (2, 2) facing one hostile at (3, 2).
///
/// Combat is in progress and it is the player's turn.
pub(crate) struct Fixture {
    pub state: CombatState,
    pub events: EventLog,
    pub grid: StaticGrid,
    pub spells: BTreeMap<SpellId, SpellDefinition>,
    pub monsters: BTreeMap<TemplateId, MonsterTemplate>,
    pub config: CombatConfig,
}

impl Fixture {
    /// Player melee spell: range 1, 3 AP, 5..8 neutral damage.
    pub const STRIKE: SpellId = SpellId(1);
    /// Hostile melee spell: range 1, 3 AP, 2..4 damage.
    pub const BITE: SpellId = SpellId(2);
    pub const HOSTILE: EntityId = EntityId(1);
    pub const HOSTILE_TEMPLATE: TemplateId = TemplateId(1);
    pub const HOSTILE_XP: u32 = 25;
    pub const HOSTILE_GOLD: (u32, u32) = (3, 9);

    pub fn player_tile() -> Position {
        Position::new(2, 2)
    }

    pub fn hostile_tile() -> Position {
        Position::new(3, 2)
    }

    fn template() -> MonsterTemplate {
        MonsterTemplate {
            id: Self::HOSTILE_TEMPLATE,
            name: "wolf".into(),
            level: 2,
            stats: ActorStats {
                hp: 40,
                hp_max: 40,
                action_points: 6,
                move_points: 3,
                initiative: 10,
                level: 2,
                elements: Default::default(),
            },
            spells: vec![Self::BITE],
            behavior: None,
            xp: Self::HOSTILE_XP,
            gold_min: Self::HOSTILE_GOLD.0,
            gold_max: Self::HOSTILE_GOLD.1,
            loot: vec![LootEntry {
                item_id: "wolf_fang".into(),
                drop_rate: 1.0,
                qty_min: 1,
                qty_max: 2,
            }],
        }
    }

    pub fn duel() -> Self {
        let mut spells = BTreeMap::new();
        spells.insert(
            Self::STRIKE,
            SpellDefinition::new(Self::STRIKE, "strike", 3)
                .with_range(1, 1)
                .with_damage(Element::Neutral, 5, 8),
        );
        spells.insert(
            Self::BITE,
            SpellDefinition::new(Self::BITE, "bite", 3)
                .with_range(1, 1)
                .with_damage(Element::Neutral, 2, 4),
        );
        let template = Self::template();

        let player_stats = ActorStats {
            hp: 50,
            hp_max: 50,
            action_points: 6,
            move_points: 3,
            initiative: 20,
            level: 5,
            elements: Default::default(),
        };
        let player = Combatant::new(EntityId::PLAYER, Role::Player, "hero", player_stats)
            .at(Self::player_tile())
            .with_spells([Self::STRIKE]);
        let hostile = template.spawn(Self::HOSTILE).at(Self::hostile_tile());

        let mut state = CombatState::new(EncounterId(1), 42);
        state.combatants.push(player);
        state.combatants.push(hostile);
        state.in_progress = true;
        build_turn_order(&mut state);

        let mut monsters = BTreeMap::new();
        monsters.insert(template.id, template);

        Self {
            state,
            events: EventLog::new(),
            grid: StaticGrid::open(10, 10),
            spells,
            monsters,
            config: CombatConfig::default(),
        }
    }

    pub fn env(&self) -> CombatEnv<'_> {
        CombatEnv::new(&self.grid, &self.spells, &self.monsters, &self.config)
    }

    /// State, environment and event log borrowed together.
    pub fn parts(&mut self) -> (&mut CombatState, CombatEnv<'_>, &mut EventLog) {
        let env = CombatEnv::new(&self.grid, &self.spells, &self.monsters, &self.config);
        (&mut self.state, env, &mut self.events)
    }

    // ===== content =====

    pub fn add_spell(&mut self, def: SpellDefinition) {
        self.spells.insert(def.id, def);
    }

    pub fn spell_mut(&mut self, id: SpellId) -> &mut SpellDefinition {
        self.spells.get_mut(&id).expect("spell registered")
    }

    // ===== combatants =====

    pub fn player(&self) -> &Combatant {
        self.state.combatant(EntityId::PLAYER).expect("player")
    }

    pub fn hostile(&self) -> &Combatant {
        self.state.combatant(Self::HOSTILE).expect("hostile")
    }

    /// Adds a hostile from the fixture template. Not queued for turns.
    pub fn add_hostile(&mut self, id: EntityId, tile: Position) {
        let hostile = Self::template().spawn(id).at(tile);
        self.state.combatants.push(hostile);
    }

    /// Adds a summon owned by the player. Not queued for turns.
    pub fn add_summon(&mut self, id: EntityId, tile: Position) {
        let mut stats = Self::template().stats;
        stats.hp = stats.hp_max;
        let mut summon = Combatant::new(id, Role::Summon, "pet", stats)
            .at(tile)
            .with_template(Self::HOSTILE_TEMPLATE)
            .with_spells([Self::BITE]);
        summon.owner = Some(EntityId::PLAYER);
        self.state.combatants.push(summon);
    }

    pub fn set_hp(&mut self, id: EntityId, hp: u32, hp_max: u32) {
        let combatant = self.state.combatant_mut(id).expect("combatant");
        combatant.stats.hp = hp;
        combatant.stats.hp_max = hp_max;
    }

    pub fn set_initiative(&mut self, id: EntityId, initiative: u32) {
        self.state.combatant_mut(id).expect("combatant").stats.initiative = initiative;
    }

    pub fn place(&mut self, id: EntityId, tile: Position) {
        self.state.combatant_mut(id).expect("combatant").position = Some(tile);
    }

    /// Hands the turn to `id` with fresh pools.
    pub fn make_active(&mut self, id: EntityId) {
        let index = self
            .state
            .actors
            .iter()
            .position(|a| *a == id)
            .expect("queued actor");
        self.state.active_index = index;
        self.state.casts_this_turn.clear();
        self.state.reset_pools_for_active();
    }

    // ===== actions =====

    pub fn try_cast(
        &mut self,
        actor: EntityId,
        spell: SpellId,
        tile: Position,
    ) -> Result<CastReport, CastError> {
        let (state, env, events) = self.parts();
        spell::try_cast(state, &env, events, actor, spell, tile)
    }

    pub fn cast(&mut self, actor: EntityId, spell: SpellId, tile: Position) -> bool {
        let (state, env, events) = self.parts();
        spell::cast(state, &env, events, actor, spell, tile)
    }

    pub fn can_cast(&self, actor: EntityId, spell: SpellId) -> bool {
        spell::can_cast(&self.state, &self.env(), actor, spell)
    }

    pub fn check(&self, actor: EntityId, spell: SpellId) -> Result<&SpellDefinition, CastError> {
        spell::check_cast(&self.state, &self.env(), actor, spell)
    }

    pub fn preview(
        &self,
        actor: EntityId,
        spell: SpellId,
        hover: Option<Position>,
    ) -> Option<SpellPreview> {
        spell::preview(&self.state, &self.env(), actor, spell, hover)
    }

    pub fn move_actor(&mut self, actor: EntityId, path: &[Position]) -> bool {
        let (state, env, events) = self.parts();
        movement::move_actor(state, &env, events, actor, path)
    }

    pub fn end_turn(&mut self) -> Result<TurnAdvance, TurnError> {
        let (state, env, events) = self.parts();
        try_end_turn(state, &env, events)
    }

    /// Lets the AI play `actor`'s turn until it ends or an action fails.
    /// Returns every decision, the final `EndTurn` included.
    pub fn run_ai(&mut self, actor: EntityId, memory: &mut TurnMemory) -> Vec<AiAction> {
        let mut actions = Vec::new();
        for _ in 0..64 {
            let (state, env, events) = self.parts();
            let action = ai::decide(state, env, actor, memory);
            actions.push(action.clone());
            let executed = match action {
                AiAction::EndTurn => false,
                AiAction::Move(path) => {
                    movement::move_along(state, &env, events, actor, &path).is_ok()
                }
                AiAction::Cast { spell, target } | AiAction::Summon { spell, tile: target } => {
                    spell::try_cast(state, &env, events, actor, spell, target).is_ok()
                }
            };
            if !executed || !state.in_progress {
                break;
            }
        }
        actions
    }
}
