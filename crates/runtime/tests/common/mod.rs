#![allow(dead_code)]

use std::sync::Arc;

use combat_content::{
    Content, ContentConfig, MonsterCatalog, PlacementCatalog, PlayerProfile, SpellCatalog, loot,
};
use combat_core::{
    ActorStats, BehaviorProfile, CaptureSpec, ChallengeDefinition, ChallengeKind,
    ChallengeRewards, Element, EncounterId, EntityId, MonsterTemplate, PlacementPattern, Position,
    SpellDefinition, SpellId, StaticGrid, SummonSpec, TemplateId,
};
use runtime::{
    CombatSession, InMemoryInventory, InMemoryWorld, OracleManager, RespawnQueue, RuntimeConfig,
    WorldMonster,
};

pub type TestSession = CombatSession<InMemoryWorld, InMemoryInventory, RespawnQueue>;

/// One-shot melee spell of the player, range 1 to 3.
pub const SMASH: SpellId = SpellId(1);
/// Cheap 1 damage spell limited to two casts per turn.
pub const BOLT: SpellId = SpellId(2);
/// One-shot bite of the wolf.
pub const BITE: SpellId = SpellId(3);
/// 1 damage hit that captures a hostile left at a quarter of its hp or less.
pub const LASSO: SpellId = SpellId(4);
/// Calls the captured companion next to the target tile.
pub const CALL: SpellId = SpellId(5);

pub const WOLF: TemplateId = TemplateId(1);
pub const WOLF_ID: EntityId = EntityId(7);
pub const WOLF_XP: u32 = 25;

/// World tile of the wolf. The single placement pattern puts the player on
/// its left and keeps the wolf in place.
pub const WOLF_TILE: Position = Position { x: 11, y: 5 };
pub const PLAYER_COMBAT_TILE: Position = Position { x: 10, y: 5 };
pub const PLAYER_WORLD_TILE: Position = Position { x: 2, y: 2 };

pub fn spells() -> Vec<SpellDefinition> {
    vec![
        SpellDefinition::new(SMASH, "smash", 3)
            .with_range(1, 3)
            .with_damage(Element::Neutral, 1000, 1000),
        SpellDefinition {
            max_casts_per_turn: 2,
            ..SpellDefinition::new(BOLT, "bolt", 2)
                .with_range(1, 8)
                .with_damage(Element::Neutral, 1, 1)
        },
        SpellDefinition::new(BITE, "bite", 3)
            .with_range(1, 1)
            .with_damage(Element::Neutral, 500, 500),
        SpellDefinition {
            capture: Some(CaptureSpec { max_hp_ratio: 0.25 }),
            ..SpellDefinition::new(LASSO, "lasso", 2)
                .with_range(1, 8)
                .with_damage(Element::Neutral, 1, 1)
        },
        SpellDefinition {
            summon: Some(SummonSpec {
                template: None,
                death_cooldown_turns: 2,
            }),
            ..SpellDefinition::new(CALL, "call", 2).with_range(1, 3)
        },
    ]
}

pub fn wolf_template() -> MonsterTemplate {
    MonsterTemplate {
        id: WOLF,
        name: "wolf".into(),
        level: 2,
        stats: ActorStats {
            hp: 40,
            hp_max: 40,
            action_points: 6,
            move_points: 3,
            initiative: 50,
            level: 2,
            elements: Default::default(),
        },
        spells: vec![BITE],
        behavior: Some(BehaviorProfile::melee(BITE)),
        xp: WOLF_XP,
        gold_min: 3,
        gold_max: 9,
        loot: vec![loot("wolf_fang", 1.0, 2, 2)],
    }
}

pub fn pattern() -> PlacementPattern {
    PlacementPattern {
        name: "line".into(),
        player_offsets: vec![(-1, 0)],
        hostile_offsets: vec![(0, 0)],
    }
}

pub fn content(challenges: Vec<ChallengeDefinition>) -> Content {
    Content {
        config: ContentConfig::default(),
        spells: SpellCatalog::from_definitions(spells()).unwrap(),
        monsters: MonsterCatalog::from_templates([wolf_template()]).unwrap(),
        challenges,
        placement: PlacementCatalog {
            patterns: vec![pattern()],
            ..PlacementCatalog::default()
        },
    }
}

pub fn challenge(id: &str, kind: ChallengeKind) -> ChallengeDefinition {
    ChallengeDefinition {
        id: id.into(),
        kind,
        rewards: ChallengeRewards {
            xp_bonus_pct: 0.2,
            drop_bonus_pct: 0.0,
        },
    }
}

/// Player profile. Initiative above the wolf's lets the player open.
pub fn player(hp: u32, hp_max: u32, initiative: u32) -> PlayerProfile {
    PlayerProfile {
        name: "hero".into(),
        stats: ActorStats {
            hp,
            hp_max,
            action_points: 10,
            move_points: 3,
            initiative,
            level: 5,
            elements: Default::default(),
        },
        spells: vec![SMASH, BOLT],
        companion: None,
    }
}

pub fn wolf_in_world(hp: u32) -> WorldMonster {
    WorldMonster {
        id: WOLF_ID,
        template: WOLF,
        name: "wolf".into(),
        tile: WOLF_TILE,
        hp,
        hp_max: 40,
        pack: Vec::new(),
        is_combat_clone: false,
    }
}

pub fn world() -> InMemoryWorld {
    InMemoryWorld::new(PLAYER_WORLD_TILE)
        .with_monster(wolf_in_world(40))
        .with_monster(WorldMonster {
            id: EntityId(8),
            tile: Position::new(3, 9),
            ..wolf_in_world(40)
        })
}

pub fn config() -> RuntimeConfig {
    RuntimeConfig::default().immediate().with_seed(7)
}

pub fn build(
    content: Content,
    player: PlayerProfile,
    world: InMemoryWorld,
    config: RuntimeConfig,
) -> TestSession {
    build_with_inventory(content, player, world, config, InMemoryInventory::default())
}

pub fn build_with_inventory(
    content: Content,
    player: PlayerProfile,
    world: InMemoryWorld,
    config: RuntimeConfig,
    inventory: InMemoryInventory,
) -> TestSession {
    let oracles = OracleManager::new(
        content,
        "field",
        Arc::new(StaticGrid::open(16, 12)),
        config.combat.clone(),
    );
    CombatSession::builder(world, inventory, RespawnQueue::default())
        .config(config)
        .oracles(oracles)
        .player(player)
        .build()
        .unwrap()
}

/// Session with one challenge in the pool and the default world.
pub fn session(challenges: Vec<ChallengeDefinition>, player: PlayerProfile) -> TestSession {
    build(content(challenges), player, world(), config())
}

/// Engages the wolf and starts the combat.
pub fn engage(session: &mut TestSession) -> EncounterId {
    session.begin_preparation(WOLF_ID, &[]).unwrap();
    let encounter = session.confirm_ready().unwrap();
    session.run_until_idle();
    encounter
}
