use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse body-part tag. The closed set stands in for a bone hierarchy.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Tail,
    Base,
    #[serde(rename = "wing_l")]
    WingL,
    #[serde(rename = "wing_r")]
    WingR,
}

impl BodyPart {
    pub const ALL: [BodyPart; 10] = [
        BodyPart::Head,
        BodyPart::Torso,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
        BodyPart::Tail,
        BodyPart::Base,
        BodyPart::WingL,
        BodyPart::WingR,
    ];

    /// Dense slot index, stable across runs (declaration order).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Torso => "torso",
            BodyPart::LeftArm => "left_arm",
            BodyPart::RightArm => "right_arm",
            BodyPart::LeftLeg => "left_leg",
            BodyPart::RightLeg => "right_leg",
            BodyPart::Tail => "tail",
            BodyPart::Base => "base",
            BodyPart::WingL => "wing_l",
            BodyPart::WingR => "wing_r",
        }
    }

    /// Arms and legs hang from their top edge (shoulder / hip line).
    #[inline]
    pub fn is_limb(self) -> bool {
        let name = self.as_str();
        name.contains("leg") || name.contains("arm")
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown body part '{s}'"))
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCategory {
    #[default]
    Character,
    Animal,
    Object,
}

impl ModelCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelCategory::Character => "character",
            ModelCategory::Animal => "animal",
            ModelCategory::Object => "object",
        }
    }

    /// Characters and animals are articulated; objects only move as a whole.
    #[inline]
    pub fn is_articulated(self) -> bool {
        !matches!(self, ModelCategory::Object)
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(ModelCategory::Character),
            "animal" => Ok(ModelCategory::Animal),
            "object" => Ok(ModelCategory::Object),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    #[default]
    None,
    Idle,
    Walk,
    Run,
    Jump,
    Attack,
    Spin,
    Float,
}

impl AnimationType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationType::None => "none",
            AnimationType::Idle => "idle",
            AnimationType::Walk => "walk",
            AnimationType::Run => "run",
            AnimationType::Jump => "jump",
            AnimationType::Attack => "attack",
            AnimationType::Spin => "spin",
            AnimationType::Float => "float",
        }
    }

    /// Animations offered for a category. `None` is always accepted in addition.
    pub fn available_for(category: ModelCategory) -> &'static [AnimationType] {
        match category {
            ModelCategory::Object => &[AnimationType::Idle, AnimationType::Spin, AnimationType::Float],
            ModelCategory::Character | ModelCategory::Animal => &[
                AnimationType::Idle,
                AnimationType::Walk,
                AnimationType::Run,
                AnimationType::Jump,
                AnimationType::Attack,
            ],
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AnimationType::None),
            "idle" => Ok(AnimationType::Idle),
            "walk" => Ok(AnimationType::Walk),
            "run" => Ok(AnimationType::Run),
            "jump" => Ok(AnimationType::Jump),
            "attack" => Ok(AnimationType::Attack),
            "spin" => Ok(AnimationType::Spin),
            "float" => Ok(AnimationType::Float),
            _ => Err(format!("unknown animation '{s}'")),
        }
    }
}

/// Where the session is in the generation cycle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    /// Concept image pending.
    Thinking,
    /// Model pending.
    Generating,
    Success,
    Error,
}

impl GenerationStatus {
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, GenerationStatus::Thinking | GenerationStatus::Generating)
    }
}
