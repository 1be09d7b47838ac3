use npchelper_engine::{
    resolve_multiattack, AttackDefinition, Character, Dice, Keyword, Keywords, RuleSystem,
    Switches,
};

fn owlbear(system: RuleSystem) -> Character {
    let mut owlbear = Character::new("Owlbear", system);
    owlbear.attacks = vec![
        AttackDefinition::new("Bite", 4, "1d6+2").unwrap().in_group(1),
        AttackDefinition::new("Longbow", 5, "1d8+3").unwrap(),
        AttackDefinition::new("Claw", 4, "1d4+2").unwrap().in_group(1),
    ];
    owlbear
}

fn names(attacks: &[&AttackDefinition]) -> Vec<String> {
    attacks.iter().map(|a| a.name.clone()).collect()
}

#[test]
fn any_member_expands_to_the_whole_group_in_stored_order() {
    let owlbear = owlbear(RuleSystem::Modern);
    assert_eq!(names(&owlbear.attacks_named("claw").unwrap()), ["Bite", "Claw"]);
    assert_eq!(names(&owlbear.attacks_named("BI").unwrap()), ["Bite", "Claw"]);
    assert_eq!(names(&owlbear.attacks_named("long").unwrap()), ["Longbow"]);
    assert!(owlbear.attacks_named("spear").is_none());
}

#[test]
fn group_lines_are_prefixed_and_flags_are_ored() {
    let owlbear = owlbear(RuleSystem::Modern);
    let group = owlbear.attacks_named("bite").unwrap();
    let mut dice = Dice::from_scripted(vec![20, 3, 5, 2, 3]);
    let res = resolve_multiattack(
        &mut dice,
        owlbear.system,
        &group,
        &Keywords::new(),
        &Switches::new(),
    )
    .unwrap();

    assert!(res.is_critical_hit);
    assert!(!res.is_critical_miss);
    assert_eq!(res.primary_roll.total(), 24);
    let labels: Vec<&str> = res.secondary_rolls.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Bite: Damage (CRIT!)", "Claw: To Hit", "Claw: Damage"]);

    insta::assert_snapshot!(res.narrative.join("\n"), @r"
    Bite: To Hit: 1d20+4 = [20] + 4 = 24
    Bite: Damage (CRIT!): 2d6+2 = [3, 5] + 2 = 10
    Claw: To Hit: 1d20+4 = [2] + 4 = 6
    Claw: Damage: 1d4+2 = [3] + 2 = 5
    ");
}

#[test]
fn a_single_fumble_marks_the_whole_sequence() {
    let owlbear = owlbear(RuleSystem::Modern);
    let group = owlbear.attacks_named("claw").unwrap();
    let mut dice = Dice::from_scripted(vec![5, 4, 1]);
    let res = resolve_multiattack(
        &mut dice,
        owlbear.system,
        &group,
        &Keywords::new(),
        &Switches::new(),
    )
    .unwrap();

    assert!(res.is_critical_miss);
    assert!(!res.is_critical_hit);
    assert_eq!(res.narrative.last().map(String::as_str), Some("Claw: Miss!"));
}

#[test]
fn every_attack_shares_the_request_keywords() {
    let owlbear = owlbear(RuleSystem::Modern);
    let group = owlbear.attacks_named("bite").unwrap();
    let mut dice = Dice::from_seed(9);
    let res = resolve_multiattack(
        &mut dice,
        owlbear.system,
        &group,
        &[Keyword::Adv].into(),
        &Switches::new(),
    )
    .unwrap();

    assert_eq!(res.primary_roll.expression().to_string(), "2d20kh1+4");
    assert_eq!(
        res.secondary("Claw: To Hit").unwrap().expression().to_string(),
        "2d20kh1+4"
    );
}

#[test]
fn legacy_group_prefixes_critical_totals() {
    let owlbear = owlbear(RuleSystem::Legacy);
    let group = owlbear.attacks_named("bite").unwrap();
    let mut dice = Dice::from_scripted(vec![20, 10, 6, 8, 3]);
    let res = resolve_multiattack(
        &mut dice,
        owlbear.system,
        &group,
        &Keywords::new(),
        &Switches::new(),
    )
    .unwrap();

    assert_eq!(res.critical_damage.len(), 1);
    assert_eq!(res.critical_damage[0].label, "Bite: Critical Damage");
    assert_eq!(res.critical_damage[0].total, 16);
    assert!(res.secondary("Bite: Confirm").is_some());
    assert!(res.secondary("Claw: Confirm").is_none());
}

#[test]
fn empty_group_resolves_to_nothing() {
    let mut dice = Dice::from_seed(1);
    let res = resolve_multiattack(
        &mut dice,
        RuleSystem::Modern,
        &[],
        &Keywords::new(),
        &Switches::new(),
    );
    assert!(res.is_none());
}
