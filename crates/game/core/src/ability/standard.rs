//! The standard ability set and its balance constants.

use super::attack::{melee_attack, ranged_attack};
use super::{AbilityDescriptor, Animation, ClassRestriction, Effect, TargetKind};
use crate::element::{Element, ElementMap, are_allied, compute_damage};
use crate::rng::Dice;
use crate::state::{CharClass, CharHandle};

pub(super) fn abilities() -> Vec<AbilityDescriptor> {
    vec![
        // ===== normal =====
        AbilityDescriptor {
            id: "slash",
            name: "Slash",
            description: "Hit an opponent with a melee weapon",
            element: Element::Normal,
            class: ClassRestriction::Only(CharClass::Fighter),
            target: TargetKind::Enemy,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Slash,
            on_scroll: false,
            on_skillbook: false,
            effect: Effect::Single(slash),
        },
        AbilityDescriptor {
            id: "shoot",
            name: "Shoot",
            description: "Hit an opponent with a ranged weapon",
            element: Element::Normal,
            class: ClassRestriction::Only(CharClass::Archer),
            target: TargetKind::Enemy,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Shoot,
            on_scroll: false,
            on_skillbook: false,
            effect: Effect::Single(shoot),
        },
        // ===== light =====
        AbilityDescriptor {
            id: "lightarrow",
            name: "Arrow of Light",
            description: "A magic arrow whose blinding effect delays an opponent; \
                          the higher the light damage, the longer the effect.",
            element: Element::Light,
            class: ClassRestriction::Only(CharClass::Archer),
            target: TargetKind::Enemy,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Shoot,
            on_scroll: false,
            on_skillbook: true,
            effect: Effect::Single(light_arrow),
        },
        AbilityDescriptor {
            id: "flash",
            name: "Flash",
            description: "A short sharp blinding flash of light that deals a little \
                          damage to all opponents and delays them.",
            element: Element::Light,
            class: ClassRestriction::Only(CharClass::Mage),
            target: TargetKind::Enemies,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Spellcast,
            on_scroll: true,
            on_skillbook: true,
            effect: Effect::Group(flash),
        },
        AbilityDescriptor {
            id: "prismatic",
            name: "Prismatic Slash",
            description: "A slash of light that deals all elements of damage.",
            element: Element::Light,
            class: ClassRestriction::Only(CharClass::Mage),
            target: TargetKind::Enemy,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Slash,
            on_scroll: false,
            on_skillbook: true,
            effect: Effect::Single(prismatic),
        },
        // ===== order =====
        AbilityDescriptor {
            id: "justice",
            name: "Slash of Justice",
            description: "Convert all damage to Order, increasing the damage \
                          tremendously, but deal some damage to yourself.",
            element: Element::Order,
            class: ClassRestriction::Only(CharClass::Fighter),
            target: TargetKind::Enemy,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Slash,
            on_scroll: false,
            on_skillbook: true,
            effect: Effect::Single(justice),
        },
        AbilityDescriptor {
            id: "impositionoforder",
            name: "Imposition of Order",
            description: "Impose a slow down on all opponents.",
            element: Element::Order,
            class: ClassRestriction::Any,
            target: TargetKind::Enemies,
            single_use: true,
            extra_turns: 0,
            animation: Animation::Spellcast,
            on_scroll: true,
            on_skillbook: true,
            effect: Effect::Group(imposition_of_order),
        },
        // ===== dark =====
        AbilityDescriptor {
            id: "terrify",
            name: "Terrify",
            description: "Scare all opponents, delaying their next turn.",
            element: Element::Dark,
            class: ClassRestriction::Any,
            target: TargetKind::Enemies,
            single_use: true,
            extra_turns: 0,
            animation: Animation::Spellcast,
            on_scroll: true,
            on_skillbook: true,
            effect: Effect::Group(terrify),
        },
        AbilityDescriptor {
            id: "blackblade",
            name: "Black Blade",
            description: "A dark slash that slows down the target; the higher the \
                          Dark damage, the greater the slowdown.",
            element: Element::Dark,
            class: ClassRestriction::Only(CharClass::Fighter),
            target: TargetKind::Enemy,
            single_use: true,
            extra_turns: 0,
            animation: Animation::Slash,
            on_scroll: false,
            on_skillbook: true,
            effect: Effect::Single(black_blade),
        },
        AbilityDescriptor {
            id: "arrowofdeath",
            name: "Arrow of Death",
            description: "Focus into the Dark, keeping a single target in sight for \
                          long enough to shoot a powerful arrow of darkness, and \
                          slowing you down in combat afterwards.",
            element: Element::Dark,
            class: ClassRestriction::Only(CharClass::Archer),
            target: TargetKind::Enemy,
            single_use: true,
            extra_turns: 1,
            animation: Animation::Shoot,
            on_scroll: false,
            on_skillbook: true,
            effect: Effect::Single(arrow_of_death),
        },
        // ===== chaos =====
        AbilityDescriptor {
            id: "berserk",
            name: "Berserk",
            description: "Convert all damage to Chaos and hit all opponents, then \
                          speed yourself up afterwards.",
            element: Element::Chaos,
            class: ClassRestriction::Only(CharClass::Fighter),
            target: TargetKind::Enemies,
            single_use: true,
            extra_turns: 0,
            animation: Animation::Slash,
            on_scroll: false,
            on_skillbook: true,
            effect: Effect::Group(berserk),
        },
        AbilityDescriptor {
            id: "chaoticbolt",
            name: "Chaotic Bolt",
            description: "An erratic bolt that deals random damage of various types, \
                          mostly Chaos, to all opponents.",
            element: Element::Chaos,
            class: ClassRestriction::Only(CharClass::Mage),
            target: TargetKind::Enemies,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Spellcast,
            on_scroll: true,
            on_skillbook: true,
            effect: Effect::Group(chaotic_bolt),
        },
        AbilityDescriptor {
            id: "multishoot",
            name: "Multiple Shot",
            description: "Hit all opponents with a ranged weapon, with a damage \
                          penalty except for Chaos damage.",
            element: Element::Chaos,
            class: ClassRestriction::Only(CharClass::Archer),
            target: TargetKind::Enemies,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Shoot,
            on_scroll: false,
            on_skillbook: true,
            effect: Effect::Group(multishoot),
        },
        // ===== life =====
        AbilityDescriptor {
            id: "heal",
            name: "Heal",
            description: "Heal an ally.",
            element: Element::Life,
            class: ClassRestriction::Only(CharClass::Mage),
            target: TargetKind::Ally,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Spellcast,
            on_scroll: true,
            on_skillbook: true,
            effect: Effect::Single(heal),
        },
        AbilityDescriptor {
            id: "drain",
            name: "Drain",
            description: "Deal Life damage magically to an opponent, and heal yourself.",
            element: Element::Life,
            class: ClassRestriction::Any,
            target: TargetKind::Enemy,
            single_use: false,
            extra_turns: 0,
            animation: Animation::Spellcast,
            on_scroll: true,
            on_skillbook: true,
            effect: Effect::Single(drain),
        },
    ]
}

fn strike(target: CharHandle<'_>, attack: &ElementMap) -> f64 {
    let damage = compute_damage(target.resists(), attack);
    target.deal_damage(damage);
    damage
}

fn slash(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    strike(target, &melee_attack(caster));
}

fn shoot(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    strike(target, &ranged_attack(caster));
}

fn light_arrow(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    let mut attack = ranged_attack(caster);
    attack.add(Element::Light, 8.0);
    if caster.element() == Element::Light {
        attack.add(Element::Light, 8.0);
    }
    let blind = ElementMap::from([(Element::Light, attack.value(Element::Light) * 2.0)]);
    let blind_time = compute_damage(target.resists(), &blind);
    strike(target, &attack);
    target.delay(blind_time);
}

fn flash(_: &mut Dice, caster: CharHandle<'_>, targets: &[CharHandle<'_>]) {
    let mut power = caster.stats().magic * 0.25;
    if are_allied(Element::Light, caster.element()) {
        power *= 1.2;
    }
    if caster.element() == Element::Light {
        power *= 1.2;
    }
    let attack = ElementMap::from([(Element::Light, power)]);
    for target in targets {
        strike(*target, &attack);
        target.delay(40.0);
    }
}

fn prismatic(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    let mut total = melee_attack(caster).total() + 8.0;
    if caster.element() == Element::Light {
        total *= 1.2;
    }
    let attack = ElementMap::from([
        (Element::Light, total * 0.4),
        (Element::Life, total * 0.2),
        (Element::Order, total * 0.2),
        (Element::Dark, total * 0.1),
        (Element::Chaos, total * 0.1),
    ]);
    strike(target, &attack);
}

fn justice(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    let mut total = melee_attack(caster).total();
    if caster.element() == Element::Order {
        total *= 1.05;
    }
    total *= 1.5;
    let damage = strike(target, &ElementMap::from([(Element::Order, total)]));
    caster.deal_damage(damage / 8.0);
}

fn imposition_of_order(_: &mut Dice, caster: CharHandle<'_>, targets: &[CharHandle<'_>]) {
    let mut base_slow = 30.0;
    if caster.element() == Element::Order {
        base_slow += 10.0;
    }
    let attack = ElementMap::from([(Element::Order, base_slow)]);
    for target in targets {
        target.slow_down(compute_damage(target.resists(), &attack));
    }
}

fn terrify(_: &mut Dice, caster: CharHandle<'_>, targets: &[CharHandle<'_>]) {
    let mut time = caster.stats().magic * 2.0;
    if caster.element() == Element::Dark {
        time *= 2.5;
    }
    for target in targets {
        if target.element() == Element::Dark {
            target.delay(time * 0.2);
        } else {
            target.delay(time);
        }
    }
}

fn black_blade(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    let attack = melee_attack(caster);
    let mut slow = attack.value(Element::Dark) + 2.0;
    if caster.element() == Element::Dark {
        slow += 5.0;
    }
    strike(target, &attack);
    target.slow_down(slow);
}

fn arrow_of_death(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    let total = ranged_attack(caster).total() * 2.0;
    strike(target, &ElementMap::from([(Element::Dark, total)]));
    caster.slow_down(20.0);
}

fn berserk(_: &mut Dice, caster: CharHandle<'_>, targets: &[CharHandle<'_>]) {
    let mut total = melee_attack(caster).total();
    if caster.element() == Element::Chaos {
        total *= 1.05;
    }
    let attack = ElementMap::from([(Element::Chaos, total / 5.0)]);
    for target in targets {
        strike(*target, &attack);
    }
    caster.speed_up(20.0);
}

fn chaotic_bolt(dice: &mut Dice, caster: CharHandle<'_>, targets: &[CharHandle<'_>]) {
    let mut max_damage = caster.stats().magic * 1.2;
    if caster.element() == Element::Chaos {
        max_damage *= 1.2;
    }
    for target in targets {
        let element = if dice.next_f64() > 0.25 {
            Element::Chaos
        } else {
            Element::ALL[dice.index(Element::COUNT)]
        };
        let amount = (max_damage * dice.next_f64()).floor() + 1.0;
        strike(*target, &ElementMap::from([(element, amount)]));
    }
}

fn multishoot(_: &mut Dice, caster: CharHandle<'_>, targets: &[CharHandle<'_>]) {
    let mut attack = ranged_attack(caster);
    for element in Element::ALL {
        if element != Element::Chaos {
            attack.scale(element, 0.25);
        }
    }
    for target in targets {
        strike(*target, &attack);
    }
}

fn heal(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    let mut healing = caster.stats().magic / 2.0;
    if caster.element() == Element::Life {
        healing *= 1.2;
    }
    if are_allied(Element::Life, target.element()) {
        healing *= 1.2;
    }
    target.heal(healing);
}

fn drain(_: &mut Dice, caster: CharHandle<'_>, target: CharHandle<'_>) {
    let mut power = caster.stats().magic * 0.75;
    if caster.element() == Element::Life {
        power *= 1.1;
    }
    let damage = strike(target, &ElementMap::from([(Element::Life, power)]));
    caster.heal(damage / 4.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{Catalog, TargetChoice};
    use crate::state::{
        Character, CombatState, SideRoster, Slot, StepId, Stats, Transaction,
    };

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    fn caster(element: Element, stats: Stats, damage: ElementMap) -> Character {
        let mut character = Character::new("Caster", element);
        character.stats = stats;
        character.damage = damage;
        character
    }

    fn encounter(player: Character, enemies: Vec<Character>) -> CombatState {
        CombatState {
            players: SideRoster::from_iter([player]),
            enemies: enemies.into_iter().collect(),
            player_items: Vec::new(),
            seed: 11,
            nonce: 0,
        }
    }

    /// Applies `id` from player 0 at enemy 0 (or every enemy) and commits.
    fn cast(id: &str, state: &mut CombatState) {
        let catalog = Catalog::standard();
        let descriptor = catalog.ability(&id.into()).unwrap();
        let choice = if descriptor.target.is_single() {
            TargetChoice::Index(0)
        } else {
            TargetChoice::Implicit
        };
        let tx = Transaction::open(StepId(0), state);
        descriptor
            .apply(&tx, Slot::player(0), choice, &mut Dice::new(7))
            .unwrap();
        tx.commit_into(state);
    }

    #[test]
    fn slash_scales_normal_damage_by_strength() {
        let mut state = encounter(
            caster(
                Element::Normal,
                Stats::new(50.0, 0.0, 0.0, 0.0),
                ElementMap::from([(Element::Normal, 20.0)]),
            ),
            vec![Character::new("Aura", Element::Normal)],
        );
        cast("slash", &mut state);
        // 20 * (1 + 0.6) = 32, no resistance.
        assert!(approx(state.enemies[0].life, 68.0));
    }

    #[test]
    fn slash_with_a_negative_attack_entry_only_deals_the_positive_part() {
        let mut target = Character::new("Aura", Element::Normal);
        target.resists = ElementMap::from([(Element::Normal, 5.0)]);
        let mut state = encounter(
            caster(
                Element::Normal,
                Stats::default(),
                ElementMap::from([(Element::Normal, -10.0), (Element::Light, 6.0)]),
            ),
            vec![target],
        );
        cast("slash", &mut state);
        // Normal contributes nothing; light meets 5 * 0.5 resistance.
        assert!(approx(state.enemies[0].life, 100.0 - 36.0 / 8.5));
    }

    #[test]
    fn justice_hurts_the_caster_by_an_eighth() {
        let mut state = encounter(
            caster(
                Element::Normal,
                Stats::default(),
                ElementMap::from([(Element::Normal, 16.0)]),
            ),
            vec![Character::new("Aura", Element::Normal)],
        );
        cast("justice", &mut state);
        // 16 * 1.5 = 24 order damage, caster takes 3.
        assert!(approx(state.enemies[0].life, 76.0));
        assert!(approx(state.players[0].life, 97.0));
    }

    #[test]
    fn terrify_barely_delays_dark_targets() {
        let mut state = encounter(
            caster(Element::Dark, Stats::new(0.0, 0.0, 10.0, 0.0), ElementMap::new()),
            vec![
                Character::new("Shade", Element::Dark),
                Character::new("Aura", Element::Light),
            ],
        );
        cast("terrify", &mut state);
        // 10 * 2 * 2.5 = 50.
        assert!(approx(state.enemies[0].next_turn, 10.0));
        assert!(approx(state.enemies[1].next_turn, 50.0));
    }

    #[test]
    fn flash_damages_and_delays_every_living_enemy() {
        let mut fallen = Character::new("Fallen", Element::Normal);
        fallen.life = 0.0;
        let mut state = encounter(
            caster(Element::Normal, Stats::new(0.0, 0.0, 40.0, 0.0), ElementMap::new()),
            vec![Character::new("Aura", Element::Normal), fallen],
        );
        cast("flash", &mut state);
        // 40 * 0.25 * 1.2 (normal is allied with light) = 12.
        assert!(approx(state.enemies[0].life, 88.0));
        assert!(approx(state.enemies[0].next_turn, 40.0));
        assert_eq!(state.enemies[1].next_turn, 0.0);
    }

    #[test]
    fn heal_is_capped_at_full_life() {
        let mut hurt = caster(Element::Life, Stats::new(0.0, 0.0, 100.0, 0.0), ElementMap::new());
        hurt.life = 30.0;
        let mut state = encounter(hurt, vec![Character::new("Aura", Element::Normal)]);
        let catalog = Catalog::standard();
        let Effect::Single(effect) = catalog.ability(&"heal".into()).unwrap().effect else {
            panic!("heal is single-target");
        };
        let tx = Transaction::open(StepId(0), &state);
        let me = tx.player_char(0).unwrap();
        // 100 / 2 * 1.2 (life caster); life is not allied with itself.
        effect(&mut Dice::new(1), me, me);
        assert!(approx(tx.player_change_record(0).unwrap().target_life(), 90.0));
        effect(&mut Dice::new(1), me, me);
        tx.commit_into(&mut state);
        assert_eq!(state.players[0].life, 100.0);
    }

    #[test]
    fn drain_returns_a_quarter_of_the_damage() {
        let mut hurt = caster(Element::Normal, Stats::new(0.0, 0.0, 40.0, 0.0), ElementMap::new());
        hurt.life = 50.0;
        let mut state = encounter(hurt, vec![Character::new("Aura", Element::Normal)]);
        cast("drain", &mut state);
        assert!(approx(state.enemies[0].life, 70.0));
        assert!(approx(state.players[0].life, 57.5));
    }

    #[test]
    fn berserk_speeds_up_the_caster() {
        let mut state = encounter(
            caster(
                Element::Chaos,
                Stats::default(),
                ElementMap::from([(Element::Normal, 10.0)]),
            ),
            vec![Character::new("Aura", Element::Normal)],
        );
        state.players[0].next_turn = 50.0;
        cast("berserk", &mut state);
        assert_eq!(state.players[0].speed, 20.0);
        assert!(state.players[0].next_turn < 50.0);
        // 10 * 1.05 / 5 chaos damage.
        assert!(approx(state.enemies[0].life, 97.9));
    }

    #[test]
    fn chaotic_bolt_is_deterministic_and_bounded() {
        let build = || {
            encounter(
                caster(Element::Chaos, Stats::new(0.0, 0.0, 10.0, 0.0), ElementMap::new()),
                vec![
                    Character::new("A", Element::Normal),
                    Character::new("B", Element::Normal),
                ],
            )
        };
        let mut first = build();
        let mut second = build();
        cast("chaoticbolt", &mut first);
        cast("chaoticbolt", &mut second);
        assert_eq!(first, second);
        for enemy in &first.enemies {
            let dealt = 100.0 - enemy.life;
            // Between 1 and floor(10 * 1.44) + 1 before resistances.
            assert!(dealt > 0.0 && dealt <= 15.0, "dealt {dealt}");
        }
    }

    #[test]
    fn multishoot_keeps_chaos_at_full_strength() {
        let mut state = encounter(
            caster(
                Element::Chaos,
                Stats::default(),
                ElementMap::from([(Element::Normal, 8.0), (Element::Chaos, 4.0)]),
            ),
            vec![Character::new("Aura", Element::Normal)],
        );
        cast("multishoot", &mut state);
        assert!(approx(state.enemies[0].life, 94.0));
    }
}
