use npchelper_engine::{
    resolve_advantage, resolve_attack, AdMode, AttackDefinition, Dice, Keyword, Keywords,
    RuleSystem, Switches,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn total_is_kept_dice_plus_modifier(
        seed in any::<u64>(),
        count in 1u32..12,
        faces in 1u32..30,
        modifier in 0u32..20,
        keep in proptest::option::of(0u32..12),
        highest in any::<bool>(),
    ) {
        let keep = keep.map(|k| k.min(count));
        let suffix = match keep {
            Some(k) if highest => format!("kh{k}"),
            Some(k) => format!("kl{k}"),
            None => String::new(),
        };
        let notation = format!("{count}d{faces}{suffix}+{modifier}");
        let mut dice = Dice::from_seed(seed);
        let roll = dice.evaluate(&notation).unwrap();

        let rolled: Vec<_> = roll.dice().copied().collect();
        prop_assert_eq!(rolled.len(), count as usize);
        prop_assert!(rolled.iter().all(|d| (1..=faces).contains(&d.value)));

        let kept: Vec<u32> = rolled.iter().filter(|d| d.kept).map(|d| d.value).collect();
        prop_assert_eq!(kept.len(), keep.unwrap_or(count) as usize);
        let kept_sum: i64 = kept.iter().map(|&v| i64::from(v)).sum();
        prop_assert_eq!(roll.total(), kept_sum + i64::from(modifier));

        let dropped = rolled.iter().filter(|d| !d.kept).map(|d| d.value);
        for value in dropped {
            if highest {
                prop_assert!(kept.iter().all(|&k| k >= value));
            } else {
                prop_assert!(kept.iter().all(|&k| k <= value));
            }
        }
    }

    #[test]
    fn adv_and_dis_always_cancel(adv in 1usize..5, dis in 1usize..5, on_entity in any::<bool>()) {
        let mut tokens = vec![Keyword::Adv; adv];
        tokens.extend(std::iter::repeat(Keyword::Dis).take(dis));
        let both: Keywords = tokens.into_iter().collect();

        prop_assert_eq!(resolve_advantage(&both, &Keywords::new()), AdMode::Normal);
        let (request, entity): (Keywords, Keywords) = if on_entity {
            ([Keyword::Adv].into(), [Keyword::Dis].into())
        } else {
            ([Keyword::Dis].into(), [Keyword::Adv].into())
        };
        prop_assert_eq!(resolve_advantage(&request, &entity), AdMode::Normal);
    }

    #[test]
    fn legacy_confirms_exactly_on_threat_or_fumble(
        natural in 1u32..=20,
        crit_range in 2u32..=20,
        confirm in 1u32..=20,
    ) {
        let attack = AttackDefinition::new("Rapier", 6, "1d6+1").unwrap().with_crit(crit_range, 2);
        let mut dice = Dice::from_scripted(vec![natural, confirm, 4]);
        let res = resolve_attack(&mut dice, RuleSystem::Legacy, &attack, &Keywords::new(), &Switches::new());

        let threat = natural >= crit_range;
        let fumble = natural == 1;
        prop_assert_eq!(res.secondary("Confirm").is_some(), threat || fumble);
        prop_assert_eq!(res.is_critical_hit, threat);
        prop_assert_eq!(res.is_critical_miss, fumble);
        prop_assert_eq!(res.critical_damage.len(), usize::from(threat));
    }

    #[test]
    fn modern_crit_doubles_only_the_dice_count(count in 1u32..6, faces in 2u32..12, natural in 1u32..=20) {
        let attack = AttackDefinition::new("Maul", 5, &format!("{count}d{faces}+2")).unwrap();
        let mut dice = Dice::from_scripted(vec![natural]);
        let res = resolve_attack(&mut dice, RuleSystem::Modern, &attack, &Keywords::new(), &Switches::new());

        match natural {
            20 => {
                prop_assert!(res.is_critical_hit);
                let damage = res.secondary("Damage (CRIT!)").unwrap();
                prop_assert_eq!(damage.expression().leading_dice().unwrap().count, count * 2);
                prop_assert_eq!(damage.expression().leading_dice().unwrap().faces, faces);
            }
            1 => {
                prop_assert!(res.is_critical_miss);
                prop_assert!(res.secondary_rolls.is_empty());
            }
            _ => {
                let damage = res.secondary("Damage").unwrap();
                prop_assert_eq!(damage.expression().leading_dice().unwrap().count, count);
            }
        }
    }

    #[test]
    fn power_attack_is_clamped_and_doubled_two_handed(points in -10i32..10, two_handed in any::<bool>()) {
        let keywords: Keywords = if two_handed { [Keyword::TwoHanded].into() } else { Keywords::new() };
        let attack = AttackDefinition::new("Greatclub", 4, "1d10").unwrap();
        let mut dice = Dice::from_scripted(vec![10, 5]);
        let res = resolve_attack(
            &mut dice,
            RuleSystem::Legacy,
            &attack,
            &keywords,
            &Switches::new().with("pow", &points.to_string()),
        );

        let n = i64::from(points.max(0));
        let bonus = if two_handed { 2 * n } else { n };
        prop_assert_eq!(res.primary_roll.total(), 14 - n);
        prop_assert_eq!(res.secondary("Damage").unwrap().total(), 5 + bonus);
    }
}
