//! The context an action is resolved against.
//!
//! An [`ActionContext`] is assembled fresh by the caller for every resolution.
//! Every section is optional: a missing ship, crew, or environment simply
//! contributes nothing. Contexts deserialize from JSON so recorded situations
//! can be replayed from disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};
use crate::table::{Quality, TableRow, WeightedEntry};

/// A named section of an [`ActionContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSection {
    /// Ship components and hull.
    Ship,
    /// Crew roster.
    Crew,
    /// Attributes and skills of the acting character.
    Character,
    /// Unlocked research.
    Research,
    /// Radiation, zone, atmosphere, stability.
    Environment,
    /// Accumulated risk, fatigue, elapsed time.
    Risk,
    /// Difficulty label.
    Difficulty,
    /// Combat opponent.
    Combat,
    /// Mission rewards.
    Mission,
}

impl std::fmt::Display for ContextSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ship => write!(f, "ship"),
            Self::Crew => write!(f, "crew"),
            Self::Character => write!(f, "character"),
            Self::Research => write!(f, "research"),
            Self::Environment => write!(f, "environment"),
            Self::Risk => write!(f, "risk"),
            Self::Difficulty => write!(f, "difficulty"),
            Self::Combat => write!(f, "combat"),
            Self::Mission => write!(f, "mission"),
        }
    }
}

/// Everything a resolution may read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionContext {
    /// The acting ship.
    pub ship: Option<ShipState>,
    /// The ship's crew.
    pub crew: Option<Vec<CrewMember>>,
    /// The acting character.
    pub character: Option<CharacterStats>,
    /// Research state.
    pub research: Option<ResearchState>,
    /// Local conditions.
    pub environment: Option<Environment>,
    /// Expedition wear.
    pub risk: Option<RiskState>,
    /// Difficulty label, e.g. `"hard"`.
    pub difficulty: Option<String>,
    /// The opponent, for combat and flight.
    pub combat: Option<CombatState>,
    /// The mission being completed.
    pub mission: Option<MissionState>,
}

impl ActionContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a context from JSON.
    pub fn from_json(content: &str) -> RulesResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a context from a JSON file.
    pub fn load(path: &Path) -> RulesResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Whether a section is present.
    pub fn has(&self, section: ContextSection) -> bool {
        match section {
            ContextSection::Ship => self.ship.is_some(),
            ContextSection::Crew => self.crew.is_some(),
            ContextSection::Character => self.character.is_some(),
            ContextSection::Research => self.research.is_some(),
            ContextSection::Environment => self.environment.is_some(),
            ContextSection::Risk => self.risk.is_some(),
            ContextSection::Difficulty => self.difficulty.is_some(),
            ContextSection::Combat => self.combat.is_some(),
            ContextSection::Mission => self.mission.is_some(),
        }
    }

    /// Set the ship section.
    pub fn with_ship(mut self, ship: ShipState) -> Self {
        self.ship = Some(ship);
        self
    }

    /// Set the crew section.
    pub fn with_crew(mut self, crew: Vec<CrewMember>) -> Self {
        self.crew = Some(crew);
        self
    }

    /// Set the character section.
    pub fn with_character(mut self, character: CharacterStats) -> Self {
        self.character = Some(character);
        self
    }

    /// Set the research section.
    pub fn with_research(mut self, research: ResearchState) -> Self {
        self.research = Some(research);
        self
    }

    /// Set the environment section.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the risk section.
    pub fn with_risk(mut self, risk: RiskState) -> Self {
        self.risk = Some(risk);
        self
    }

    /// Set the difficulty label.
    pub fn with_difficulty(mut self, label: impl Into<String>) -> Self {
        self.difficulty = Some(label.into());
        self
    }

    /// Set the combat section.
    pub fn with_combat(mut self, combat: CombatState) -> Self {
        self.combat = Some(combat);
        self
    }

    /// Set the mission section.
    pub fn with_mission(mut self, mission: MissionState) -> Self {
        self.mission = Some(mission);
        self
    }

    /// Crew members able to help: aboard and uninjured.
    pub fn available_crew(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.iter().flatten().filter(|m| m.is_available())
    }
}

// ---------------------------------------------------------------------------
// Ship
// ---------------------------------------------------------------------------

/// Kind of ship component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Mining drill.
    Drill,
    /// Salvage rig.
    SalvageRig,
    /// Sensor suite.
    Scanner,
    /// Weapon mount.
    Weapon,
    /// Drive.
    Engine,
    /// Repair bay.
    RepairBay,
}

/// One installed component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipComponent {
    /// Component kind.
    pub kind: ComponentKind,
    /// Upgrade tier (0 = stock).
    #[serde(default)]
    pub tier: u32,
    /// Remaining health as a fraction of maximum.
    #[serde(default = "full_health")]
    pub health: f64,
}

fn full_health() -> f64 {
    1.0
}

impl ShipComponent {
    /// A healthy component.
    pub fn new(kind: ComponentKind, tier: u32) -> Self {
        Self {
            kind,
            tier,
            health: 1.0,
        }
    }

    /// Set the health fraction.
    pub fn with_health(mut self, health: f64) -> Self {
        self.health = health;
        self
    }
}

/// The acting ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipState {
    /// Installed components.
    pub components: Vec<ShipComponent>,
    /// Hull integrity as a fraction of maximum.
    pub hull: f64,
}

impl Default for ShipState {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            hull: 1.0,
        }
    }
}

impl ShipState {
    /// A ship with full hull and no components.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a component.
    pub fn with_component(mut self, component: ShipComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Set the hull fraction.
    pub fn with_hull(mut self, hull: f64) -> Self {
        self.hull = hull;
        self
    }
}

// ---------------------------------------------------------------------------
// Crew
// ---------------------------------------------------------------------------

/// A crew member's specialty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewRole {
    /// Keeps machinery running.
    Engineer,
    /// Flies the ship.
    Pilot,
    /// Analyses finds.
    Scientist,
    /// Handles threats.
    Security,
    /// Treats injuries.
    Medic,
}

/// A crew member's temperament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Presses forward.
    Bold,
    /// Hangs back.
    Cautious,
    /// Takes chances.
    Reckless,
    /// Pokes at everything.
    Curious,
    /// Unflappable.
    Steady,
}

/// One crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Display name.
    pub name: String,
    /// Specialty.
    pub role: CrewRole,
    /// Temperament, if known.
    #[serde(default)]
    pub personality: Option<Personality>,
    /// Ashore and unavailable.
    #[serde(default)]
    pub docked: bool,
    /// Injured and unavailable.
    #[serde(default)]
    pub injured: bool,
}

impl CrewMember {
    /// A present, healthy crew member.
    pub fn new(name: impl Into<String>, role: CrewRole) -> Self {
        Self {
            name: name.into(),
            role,
            personality: None,
            docked: false,
            injured: false,
        }
    }

    /// Set the personality.
    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }

    /// Mark as docked.
    pub fn docked(mut self) -> Self {
        self.docked = true;
        self
    }

    /// Mark as injured.
    pub fn injured(mut self) -> Self {
        self.injured = true;
        self
    }

    /// Aboard and uninjured.
    pub fn is_available(&self) -> bool {
        !self.docked && !self.injured
    }
}

// ---------------------------------------------------------------------------
// Character, research
// ---------------------------------------------------------------------------

/// Attribute and skill scores of the acting character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    /// Attribute scores by name (10 is average).
    pub attributes: BTreeMap<String, i32>,
    /// Skill ranks by name.
    pub skills: BTreeMap<String, i32>,
}

impl CharacterStats {
    /// Empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute score.
    pub fn with_attribute(mut self, name: impl Into<String>, score: i32) -> Self {
        self.attributes.insert(name.into(), score);
        self
    }

    /// Set a skill rank.
    pub fn with_skill(mut self, name: impl Into<String>, rank: i32) -> Self {
        self.skills.insert(name.into(), rank);
        self
    }
}

/// Research the player has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchState {
    /// Unlocked research ids.
    pub unlocked: BTreeSet<String>,
}

impl ResearchState {
    /// Research state with the given ids unlocked.
    pub fn with_unlocked<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unlocked: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a research id is unlocked.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }
}

// ---------------------------------------------------------------------------
// Environment, risk
// ---------------------------------------------------------------------------

/// Ambient radiation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Radiation {
    /// Shielded or background only.
    #[default]
    None,
    /// Noticeable.
    Low,
    /// Dangerous.
    High,
    /// Lethal without protection.
    Extreme,
}

/// Kind of space the action takes place in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    /// Empty space.
    #[default]
    Open,
    /// Dense rock field.
    AsteroidField,
    /// Gas cloud that blinds sensors.
    Nebula,
    /// Wreckage from old battles.
    DebrisField,
    /// Something that should not be there.
    Anomaly,
}

/// Atmosphere at the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Atmosphere {
    /// Safe to breathe.
    #[default]
    Breathable,
    /// Thin but survivable.
    Thin,
    /// Poisonous.
    Toxic,
    /// None at all.
    Vacuum,
    /// Eats through suits.
    Corrosive,
}

/// Structural condition of the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    /// Sound.
    #[default]
    Stable,
    /// Creaking.
    Unstable,
    /// Coming apart.
    Collapsing,
}

/// Local conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Radiation level.
    pub radiation: Radiation,
    /// Zone type.
    pub zone: ZoneType,
    /// Atmosphere.
    pub atmosphere: Atmosphere,
    /// Structural stability.
    pub stability: Stability,
}

/// Wear accumulated over the current expedition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskState {
    /// Accumulated risk points.
    pub accumulated_risk: u32,
    /// Crew fatigue points.
    pub fatigue: u32,
    /// Hours since the expedition began.
    pub elapsed_hours: f64,
}

// ---------------------------------------------------------------------------
// Combat, mission
// ---------------------------------------------------------------------------

/// Target number used when a combat section omits the defense.
pub const DEFAULT_DEFENSE: i32 = 12;

/// Pursuit rating used when a combat section omits it.
pub const DEFAULT_PURSUIT: i32 = 10;

/// The opponent in a combat exchange or chase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatState {
    /// Opponent name.
    pub target: String,
    /// To-hit target number.
    pub defense: i32,
    /// Flat damage reduction.
    pub armor: i32,
    /// Chase rating when fleeing.
    pub pursuit: i32,
    /// Rounds the encounter has lasted.
    pub rounds: u32,
    /// Attacker's weapon damage notation; `1d8` when absent.
    pub weapon_damage: Option<String>,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            target: "hostile".to_string(),
            defense: DEFAULT_DEFENSE,
            armor: 0,
            pursuit: DEFAULT_PURSUIT,
            rounds: 0,
            weapon_damage: None,
        }
    }
}

impl CombatState {
    /// An opponent with the given defense.
    pub fn new(target: impl Into<String>, defense: i32) -> Self {
        Self {
            target: target.into(),
            defense,
            ..Self::default()
        }
    }

    /// Set armor.
    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor;
        self
    }

    /// Set pursuit rating.
    pub fn with_pursuit(mut self, pursuit: i32) -> Self {
        self.pursuit = pursuit;
        self
    }

    /// Set elapsed rounds.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set weapon damage notation.
    pub fn with_weapon(mut self, notation: impl Into<String>) -> Self {
        self.weapon_damage = Some(notation.into());
        self
    }
}

/// A fixed item reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardItem {
    /// Item id.
    pub item: String,
    /// Quantity granted at full success.
    pub quantity: u32,
    /// Quality grade.
    #[serde(default = "common_quality")]
    pub quality: Quality,
}

fn common_quality() -> Quality {
    Quality::Common
}

/// The mission being completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionState {
    /// Mission id.
    pub id: String,
    /// Baseline item rewards.
    pub items: Vec<RewardItem>,
    /// Baseline credit reward.
    pub credits: u32,
    /// Mission-specific bonus pool; the default bonus table when empty.
    pub bonus_pool: Vec<WeightedEntry<TableRow>>,
    /// Story flag unlocked on success.
    pub story_flag: Option<String>,
}

impl MissionState {
    /// A mission paying only credits.
    pub fn new(id: impl Into<String>, credits: u32) -> Self {
        Self {
            id: id.into(),
            credits,
            ..Self::default()
        }
    }

    /// Add a baseline item reward.
    pub fn with_item(mut self, item: impl Into<String>, quantity: u32) -> Self {
        self.items.push(RewardItem {
            item: item.into(),
            quantity,
            quality: Quality::Common,
        });
        self
    }

    /// Set the story flag.
    pub fn with_story_flag(mut self, flag: impl Into<String>) -> Self {
        self.story_flag = Some(flag.into());
        self
    }
}
