use npchelper_engine::{Dice, EngineError};

#[test]
fn keep_highest_marks_the_rest_dropped() {
    let mut dice = Dice::from_scripted(vec![3, 6, 1, 5]);
    let roll = dice.evaluate("4d6kh3").unwrap();
    assert_eq!(roll.total(), 14);
    assert_eq!(roll.kept_values(), vec![3, 6, 5]);
    assert_eq!(roll.dice().filter(|d| !d.kept).count(), 1);
    assert_eq!(roll.to_string(), "4d6kh3 = [3, 6, (1), 5] = 14");
}

#[test]
fn keep_lowest_with_modifier() {
    let mut dice = Dice::from_scripted(vec![15, 4]);
    let roll = dice.evaluate("2d20kl1+2").unwrap();
    assert_eq!(roll.total(), 6);
    assert_eq!(roll.natural(), Some(4));
}

#[test]
fn scripted_faces_are_clamped_to_the_die() {
    let mut dice = Dice::from_scripted(vec![9, 0]);
    let roll = dice.evaluate("2d6").unwrap();
    assert_eq!(roll.kept_values(), vec![6, 1]);
}

#[test]
fn malformed_expression_draws_nothing() {
    let mut dice = Dice::from_scripted(vec![4]);
    let err = dice.evaluate("4d6kh5").unwrap_err();
    assert!(matches!(err, EngineError::MalformedExpression { .. }));
    assert!(err.to_string().contains("4d6kh5"));

    let roll = dice.evaluate("1d6").unwrap();
    assert_eq!(roll.total(), 4);
}

#[test]
fn constant_only_expressions_have_no_natural() {
    let mut dice = Dice::from_seed(1);
    let roll = dice.evaluate("7").unwrap();
    assert_eq!(roll.total(), 7);
    assert_eq!(roll.natural(), None);
    assert!(!roll.natural_is_max());
}

#[test]
fn seeded_streams_repeat() {
    let totals = |seed| {
        let mut dice = Dice::from_seed(seed);
        (0..20)
            .map(|_| dice.evaluate("3d8+1").unwrap().total())
            .collect::<Vec<_>>()
    };
    assert_eq!(totals(99), totals(99));
    assert!(totals(99).iter().all(|t| (4..=25).contains(t)));
}
