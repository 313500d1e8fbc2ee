//! Unit tests for the intersection topology.

#[cfg(test)]
mod arms {
    use crate::{Arm, MovementGroup};

    #[test]
    fn right_neighbor_is_cyclic() {
        assert_eq!(Arm::Down.right_neighbor(), Arm::Right);
        assert_eq!(Arm::Right.right_neighbor(), Arm::Up);
        assert_eq!(Arm::Up.right_neighbor(), Arm::Left);
        assert_eq!(Arm::Left.right_neighbor(), Arm::Down);
    }

    #[test]
    fn four_right_turns_return_home() {
        for arm in Arm::ALL {
            let mut a = arm;
            for _ in 0..4 {
                a = a.right_neighbor();
            }
            assert_eq!(a, arm);
        }
    }

    #[test]
    fn opposite_is_involutive() {
        for arm in Arm::ALL {
            assert_ne!(arm.opposite(), arm);
            assert_eq!(arm.opposite().opposite(), arm);
        }
    }

    #[test]
    fn groups_partition_the_arms() {
        assert_eq!(Arm::Down.group(), MovementGroup::Vertical);
        assert_eq!(Arm::Up.group(), MovementGroup::Vertical);
        assert_eq!(Arm::Left.group(), MovementGroup::Horizontal);
        assert_eq!(Arm::Right.group(), MovementGroup::Horizontal);
        for arm in Arm::ALL {
            assert_eq!(arm.group(), arm.opposite().group());
            assert_ne!(arm.group(), arm.right_neighbor().group());
        }
    }
}

#[cfg(test)]
mod routes {
    use crate::{Arm, Route, Turn};

    #[test]
    fn twelve_canonical_routes() {
        assert_eq!(Route::ALL.len(), 12);
        // All distinct, none degenerate.
        for (i, a) in Route::ALL.iter().enumerate() {
            assert_ne!(a.entry(), a.exit());
            for b in &Route::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn code_roundtrip() {
        for route in Route::ALL {
            let parsed: Route = route.code().parse().unwrap();
            assert_eq!(parsed, route);
        }
    }

    #[test]
    fn bad_codes_are_rejected() {
        assert!("dd".parse::<Route>().is_err()); // U-turn
        assert!("dx".parse::<Route>().is_err());
        assert!("d".parse::<Route>().is_err());
        assert!("dul".parse::<Route>().is_err());
        assert!("".parse::<Route>().is_err());
    }

    #[test]
    fn turn_classification() {
        // The four right-turn targets from the original network definition.
        for (entry, exit) in [
            (Arm::Left, Arm::Down),
            (Arm::Down, Arm::Right),
            (Arm::Right, Arm::Up),
            (Arm::Up, Arm::Left),
        ] {
            assert_eq!(Route::new(entry, exit).unwrap().turn(), Turn::Right);
        }
        for code in ["du", "ud", "lr", "rl"] {
            assert_eq!(code.parse::<Route>().unwrap().turn(), Turn::Straight);
        }
        for code in ["dl", "ru", "ul", "rd"] {
            assert_eq!(code.parse::<Route>().unwrap().turn(), Turn::Crossing);
        }
    }

    #[test]
    fn turn_classes_strictly_decrease_in_priority() {
        assert!(Turn::Right.class() < Turn::Straight.class());
        assert!(Turn::Straight.class() < Turn::Crossing.class());
    }
}

#[cfg(test)]
mod masks {
    use crate::{ConflictMask, Route, Turn};

    #[test]
    fn every_route_has_a_nonempty_mask() {
        for route in Route::ALL {
            assert_ne!(route.mask(), ConflictMask::EMPTY, "route {route}");
        }
    }

    #[test]
    fn opposite_throughs_are_complements() {
        let du: Route = "du".parse().unwrap();
        let ud: Route = "ud".parse().unwrap();
        assert_eq!(ud.mask(), du.mask().invert());
        assert!(!du.mask().overlaps(ud.mask()));

        let lr: Route = "lr".parse().unwrap();
        let rl: Route = "rl".parse().unwrap();
        assert_eq!(rl.mask(), lr.mask().invert());
        assert!(!lr.mask().overlaps(rl.mask()));
    }

    #[test]
    fn perpendicular_throughs_are_transposes() {
        let du: Route = "du".parse().unwrap();
        let lr: Route = "lr".parse().unwrap();
        assert_eq!(lr.mask(), du.mask().transpose());

        let ud: Route = "ud".parse().unwrap();
        let rl: Route = "rl".parse().unwrap();
        assert_eq!(rl.mask(), ud.mask().transpose());
    }

    #[test]
    fn right_turns_occupy_one_cell() {
        for route in Route::ALL {
            if route.turn() == Turn::Right {
                assert_eq!(route.mask().cell_count(), 1, "route {route}");
            }
        }
    }

    #[test]
    fn straights_two_cells_crossings_three() {
        for route in Route::ALL {
            match route.turn() {
                Turn::Right    => {}
                Turn::Straight => assert_eq!(route.mask().cell_count(), 2, "route {route}"),
                Turn::Crossing => assert_eq!(route.mask().cell_count(), 3, "route {route}"),
            }
        }
    }

    #[test]
    fn transpose_and_invert_are_involutive() {
        for route in Route::ALL {
            let m = route.mask();
            assert_eq!(m.transpose().transpose(), m);
            assert_eq!(m.invert().invert(), m);
        }
    }

    #[test]
    fn cells_iterator_matches_contains() {
        for route in Route::ALL {
            let m = route.mask();
            let listed: Vec<usize> = m.cells().collect();
            assert_eq!(listed.len() as u32, m.cell_count());
            for i in &listed {
                assert!(m.contains(i / 2, i % 2));
            }
        }
    }
}
