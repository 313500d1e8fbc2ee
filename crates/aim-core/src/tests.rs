//! Unit tests for aim-core primitives.

#[cfg(test)]
mod ids {
    use crate::VehicleId;

    #[test]
    fn index_roundtrip() {
        let id = VehicleId(42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn ordering() {
        assert!(VehicleId(0) < VehicleId(1));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(VehicleId::INVALID.0, u32::MAX);
        assert_eq!(VehicleId::default(), VehicleId::INVALID);
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(VehicleId(7).to_string(), "000007");
        assert_eq!(VehicleId(123_456).to_string(), "123456");
    }
}

#[cfg(test)]
mod geom {
    use crate::Point2;

    #[test]
    fn zero_distance() {
        let p = Point2::new(3.0, 4.0);
        assert_eq!(p.distance(p), 0.0);
    }

    #[test]
    fn pythagorean_distance_to_junction() {
        assert_eq!(Point2::new(3.0, 4.0).distance_to_junction(), 5.0);
        assert_eq!(Point2::new(0.0, -100.0).distance_to_junction(), 100.0);
    }
}

#[cfg(test)]
mod time {
    use crate::{quantize, RunConfig, StepClock, Tick};

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(5) + 3, Tick(8));
        assert_eq!(Tick(8).since(Tick(5)), 3);
        assert_eq!(Tick(5).since(Tick(8)), 0); // saturates
        assert_eq!(Tick(5).offset(10), Tick(15));
    }

    #[test]
    fn quantize_rounds_to_nearest_slot() {
        assert_eq!(quantize(Tick(14), 10), Tick(10));
        assert_eq!(quantize(Tick(15), 10), Tick(20));
        assert_eq!(quantize(Tick(20), 10), Tick(20));
        assert_eq!(quantize(Tick(0), 10), Tick(0));
    }

    #[test]
    fn clock_advances_and_converts() {
        let mut clock = StepClock::new(0.1);
        for _ in 0..25 {
            clock.advance();
        }
        assert_eq!(clock.current, Tick(25));
        assert!((clock.elapsed_secs() - 2.5).abs() < 1e-9);
        assert_eq!(clock.ticks_for_secs(2.0), 20);
        assert!((clock.secs_for_ticks(20) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut cfg = RunConfig::default();
        cfg.total_steps = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = RunConfig::default();
        cfg.step_secs = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = RunConfig::default();
        cfg.spawn_probability = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = RunConfig::default();
        cfg.depart_speed_mps = -1.0;
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.gen_range(0..1_000_000u64), b.gen_range(0..1_000_000u64));
        }
    }

    #[test]
    fn children_diverge_from_parent() {
        let mut root = SimRng::new(7);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        let draws0: Vec<u64> = (0..8).map(|_| c0.gen_range(0..u64::MAX)).collect();
        let draws1: Vec<u64> = (0..8).map(|_| c1.gen_range(0..u64::MAX)).collect();
        assert_ne!(draws0, draws1);
    }

    #[test]
    fn choose_on_empty_slice_is_none() {
        let mut rng = SimRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}
