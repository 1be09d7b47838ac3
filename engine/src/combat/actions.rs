use tracing::debug;

use crate::advantage::{resolve_advantage, Keyword, Keywords};
use crate::combat::{AttackDefinition, PowerAttack};
use crate::expr::DiceExpression;
use crate::request::Switches;
use crate::resolution::{CriticalDamage, LabeledRoll, ResolutionResult};
use crate::rules::{RuleSystem, ToHitClass};
use crate::Dice;

/// Resolve one attack: to-hit, classification, optional confirmation, then damage.
pub fn resolve_attack(
    dice: &mut Dice,
    system: RuleSystem,
    attack: &AttackDefinition,
    keywords: &Keywords,
    switches: &Switches,
) -> ResolutionResult {
    let mode = resolve_advantage(keywords, &attack.keywords);
    let mut to_hit = DiceExpression::d20(mode).with_modifier(attack.hit_modifier);
    let mut damage = attack.damage.clone();
    let mut narrative = Vec::new();

    let two_handed = keywords.union(&attack.keywords).contains(Keyword::TwoHanded);
    let power = if system.supports_power_attack() {
        PowerAttack::new(switches.power_attack(), two_handed)
    } else {
        if switches.get("pow").is_some() {
            debug!(%system, attack = %attack.name, "power attack has no effect in this system");
        }
        None
    };
    if let Some(power) = power {
        to_hit = to_hit.with_modifier(-power.penalty);
        damage = damage.with_modifier(power.bonus);
        narrative.push(power.note());
    }

    let to_hit_roll = dice.roll(&to_hit);
    let class = system.classify_to_hit(&to_hit_roll, attack.crit_range);
    debug!(
        %system,
        attack = %attack.name,
        ?mode,
        natural = ?to_hit_roll.natural(),
        ?class,
        "classified to-hit roll"
    );
    narrative.push(format!("To Hit: {to_hit_roll}"));

    let mut result = ResolutionResult::new(to_hit_roll);
    result.is_critical_hit = class == ToHitClass::Critical;
    result.is_critical_miss = class == ToHitClass::Fumble;

    // Reported for the table to judge; the flags above do not depend on it.
    if system.requires_confirmation(class) {
        let confirm = dice.roll(&to_hit);
        let heading = if class == ToHitClass::Fumble {
            "Fumble!"
        } else {
            "Critical Threat!"
        };
        narrative.push(format!("{heading} Confirm: {confirm}"));
        result.secondary_rolls.push(LabeledRoll::new("Confirm", confirm));
    }

    if class == ToHitClass::Fumble {
        narrative.push("Miss!".to_string());
    } else {
        let label = system.damage_label(class);
        let damage_roll = dice.roll(&system.apply_critical_damage(&damage, class));
        narrative.push(format!("{label}: {damage_roll}"));

        if let Some(total) = system.critical_total(damage_roll.total(), attack.crit_multiplier, class) {
            narrative.push(format!(
                "Critical Damage (x{}): {total}",
                attack.crit_multiplier
            ));
            result.critical_damage.push(CriticalDamage {
                label: "Critical Damage".to_string(),
                multiplier: attack.crit_multiplier,
                total,
            });
        }
        result.secondary_rolls.push(LabeledRoll::new(label, damage_roll));
    }

    result.narrative = narrative;
    result
}

/// Resolve a multi-attack group in order with the same keywords and switches.
///
/// The first attack's to-hit is the primary roll; every other roll, total and line is
/// prefixed with its attack's name. Crit and fumble flags are OR-ed. `None` when empty.
pub fn resolve_multiattack(
    dice: &mut Dice,
    system: RuleSystem,
    attacks: &[&AttackDefinition],
    keywords: &Keywords,
    switches: &Switches,
) -> Option<ResolutionResult> {
    let (first, rest) = attacks.split_first()?;

    let part = resolve_attack(dice, system, first, keywords, switches);
    let mut combined = ResolutionResult::new(part.primary_roll.clone());
    absorb(&mut combined, &first.name, part);

    for attack in rest {
        let part = resolve_attack(dice, system, attack, keywords, switches);
        combined.secondary_rolls.push(LabeledRoll::new(
            format!("{}: To Hit", attack.name),
            part.primary_roll.clone(),
        ));
        absorb(&mut combined, &attack.name, part);
    }

    Some(combined)
}

fn absorb(combined: &mut ResolutionResult, name: &str, part: ResolutionResult) {
    combined.is_critical_hit |= part.is_critical_hit;
    combined.is_critical_miss |= part.is_critical_miss;
    combined
        .secondary_rolls
        .extend(part.secondary_rolls.into_iter().map(|r| LabeledRoll {
            label: format!("{name}: {}", r.label),
            roll: r.roll,
        }));
    combined
        .critical_damage
        .extend(part.critical_damage.into_iter().map(|c| CriticalDamage {
            label: format!("{name}: {}", c.label),
            ..c
        }));
    combined
        .narrative
        .extend(part.narrative.into_iter().map(|line| format!("{name}: {line}")));
}
