//! Tier templates that turn a difficulty request into concrete enemy stats.

use std::ops::RangeInclusive;

use dungeon_spawn_core::{CharacterClass, EnemyStats, EnemyTier};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sampling::next_gaussian;

/// Tile thresholds separating small, medium and large enemy groups.
///
/// A zone must hold at least as many free tiles as the threshold of the
/// requested tier. The same thresholds cap each tier's head count, so a zone
/// that qualifies can always seat the whole group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSizeBounds {
    /// Upper bound of a small group; minimum zone size for impossible groups.
    pub small: usize,
    /// Upper bound of a medium group; minimum zone size for average and difficult groups.
    pub medium: usize,
    /// Upper bound of a large group; minimum zone size for trivial groups.
    pub large: usize,
}

impl Default for GroupSizeBounds {
    fn default() -> Self {
        Self {
            small: 2,
            medium: 5,
            large: 8,
        }
    }
}

impl GroupSizeBounds {
    /// Checks that the bounds are positive and strictly ascending.
    pub fn validate(&self) -> Result<(), GroupSizeError> {
        if self.small == 0 || self.small >= self.medium || self.medium >= self.large {
            return Err(GroupSizeError::NotAscending(*self));
        }
        Ok(())
    }

    /// Fewest free tiles a zone needs to host a group of the tier.
    #[must_use]
    pub const fn minimum_tiles(&self, tier: EnemyTier) -> usize {
        match tier {
            EnemyTier::Trivial => self.large,
            EnemyTier::Average | EnemyTier::Difficult => self.medium,
            EnemyTier::Impossible => self.small,
        }
    }
}

/// Reasons a [`GroupSizeBounds`] value is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GroupSizeError {
    /// The thresholds must satisfy `0 < small < medium < large`.
    #[error("group size bounds must satisfy 0 < small < medium < large, got {0:?}")]
    NotAscending(GroupSizeBounds),
}

/// Concrete group produced by a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyGroup {
    /// Tier the group was generated for.
    pub tier: EnemyTier,
    /// Stats of every enemy in the group.
    pub members: Vec<EnemyStats>,
}

/// Stateless factory describing the composition of a tier's groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyGroupTemplate {
    tier: EnemyTier,
    head_count: RangeInclusive<usize>,
    levels: RangeInclusive<u32>,
}

impl EnemyGroupTemplate {
    /// Template for the provided tier sized against `bounds`.
    #[must_use]
    pub fn for_tier(tier: EnemyTier, bounds: &GroupSizeBounds) -> Self {
        let (head_count, levels) = match tier {
            EnemyTier::Trivial => (span(bounds.medium + 1, bounds.large), 1..=1),
            EnemyTier::Average => (span(bounds.small + 1, bounds.medium), 2..=3),
            EnemyTier::Difficult => (span(bounds.small + 1, bounds.medium), 4..=5),
            EnemyTier::Impossible => (span(1, bounds.small), 6..=8),
        };
        Self {
            tier,
            head_count,
            levels,
        }
    }

    /// Tier the template generates groups for.
    #[must_use]
    pub const fn tier(&self) -> EnemyTier {
        self.tier
    }

    /// Inclusive range of group sizes the template produces.
    #[must_use]
    pub fn head_count(&self) -> RangeInclusive<usize> {
        self.head_count.clone()
    }

    /// Generates a group for a dungeon floor `depth` levels deep.
    ///
    /// Every level of depth beyond the first raises each member's level by one.
    pub fn generate<R: Rng>(&self, depth: u32, rng: &mut R) -> EnemyGroup {
        let count = rng.gen_range(self.head_count.clone());
        let depth_bonus = depth.saturating_sub(1);

        let members = (0..count)
            .map(|_| {
                let class = CharacterClass::ALL[rng.gen_range(0..CharacterClass::ALL.len())];
                let level = rng.gen_range(self.levels.clone()).saturating_add(depth_bonus);
                enemy_at_level(class, level, rng)
            })
            .collect();

        EnemyGroup {
            tier: self.tier,
            members,
        }
    }
}

fn span(low: usize, high: usize) -> RangeInclusive<usize> {
    low.min(high)..=high
}

/// Builds an enemy of `class` that levelled up from one to `level`.
pub fn enemy_at_level<R: Rng>(class: CharacterClass, level: u32, rng: &mut R) -> EnemyStats {
    let mut enemy = EnemyStats::base(class);
    let (attack_min, attack_max) = class.attack_growth();
    let (health_min, health_max) = class.health_growth();

    for reached in 2..=level {
        enemy.stats.attack += growth(attack_min, attack_max, rng);
        enemy.stats.health += growth(health_min, health_max, rng);
        enemy.stats.range += class.range_growth(reached);
        enemy.stats.speed += class.speed_growth(reached);
    }
    enemy.level = level.max(1);
    enemy
}

fn growth<R: Rng>(min: u32, max: u32, rng: &mut R) -> u32 {
    let mean = (min + max) / 2;
    let value = next_gaussian(f64::from(mean), 1.0, i64::from(min), i64::from(max), rng);
    u32::try_from(value).unwrap_or(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn default_bounds_are_valid() {
        assert_eq!(GroupSizeBounds::default().validate(), Ok(()));
    }

    #[test]
    fn non_ascending_bounds_are_rejected() {
        let bounds = GroupSizeBounds {
            small: 4,
            medium: 4,
            large: 9,
        };
        assert_eq!(bounds.validate(), Err(GroupSizeError::NotAscending(bounds)));
    }

    #[test]
    fn minimum_tiles_follow_tier_thresholds() {
        let bounds = GroupSizeBounds::default();
        assert_eq!(bounds.minimum_tiles(EnemyTier::Trivial), 8);
        assert_eq!(bounds.minimum_tiles(EnemyTier::Average), 5);
        assert_eq!(bounds.minimum_tiles(EnemyTier::Difficult), 5);
        assert_eq!(bounds.minimum_tiles(EnemyTier::Impossible), 2);
    }

    #[test]
    fn generated_groups_fit_their_minimum_zone() {
        let bounds = GroupSizeBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        for tier in EnemyTier::ALL {
            let template = EnemyGroupTemplate::for_tier(tier, &bounds);
            for _ in 0..50 {
                let group = template.generate(1, &mut rng);
                assert_eq!(group.tier, tier);
                assert!(!group.members.is_empty());
                assert!(group.members.len() <= bounds.minimum_tiles(tier));
            }
        }
    }

    #[test]
    fn harder_tiers_produce_higher_levels() {
        let bounds = GroupSizeBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let trivial =
            EnemyGroupTemplate::for_tier(EnemyTier::Trivial, &bounds).generate(1, &mut rng);
        let impossible =
            EnemyGroupTemplate::for_tier(EnemyTier::Impossible, &bounds).generate(1, &mut rng);

        assert!(trivial.members.iter().all(|enemy| enemy.level == 1));
        assert!(impossible.members.iter().all(|enemy| (6..=8).contains(&enemy.level)));
    }

    #[test]
    fn depth_raises_member_levels() {
        let bounds = GroupSizeBounds::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let group = EnemyGroupTemplate::for_tier(EnemyTier::Trivial, &bounds).generate(3, &mut rng);

        assert!(group.members.iter().all(|enemy| enemy.level == 3));
    }

    #[test]
    fn levelling_grows_stats_within_class_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(30);
        let knight = enemy_at_level(CharacterClass::Knight, 11, &mut rng);
        let base = CharacterClass::Knight.base_stats();

        assert_eq!(knight.level, 11);
        assert!((base.attack + 10..=base.attack + 30).contains(&knight.stats.attack));
        assert!((base.health + 30..=base.health + 40).contains(&knight.stats.health));
        assert_eq!(knight.stats.range, base.range);
        assert_eq!(knight.stats.speed, base.speed + 1);
    }

    #[test]
    fn level_one_enemy_keeps_base_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(30);
        let hunter = enemy_at_level(CharacterClass::Hunter, 1, &mut rng);
        assert_eq!(hunter, EnemyStats::base(CharacterClass::Hunter));
    }
}
