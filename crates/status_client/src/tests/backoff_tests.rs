use super::*;
use rand::{rngs::StdRng, SeedableRng};

fn backoff() -> Backoff {
    Backoff {
        base: Duration::from_secs(2),
        max: Duration::from_secs(30),
        jitter_fraction: 0.25,
    }
}

#[test]
fn ceiling_doubles_until_max() {
    let backoff = backoff();
    assert_eq!(backoff.ceiling(0), Duration::ZERO);
    assert_eq!(backoff.ceiling(1), Duration::from_secs(2));
    assert_eq!(backoff.ceiling(2), Duration::from_secs(4));
    assert_eq!(backoff.ceiling(4), Duration::from_secs(16));
    assert_eq!(backoff.ceiling(5), Duration::from_secs(30));
    assert_eq!(backoff.ceiling(u32::MAX), Duration::from_secs(30));
}

#[test]
fn jittered_delay_stays_within_band() {
    let backoff = backoff();
    let mut rng = StdRng::seed_from_u64(7);
    for failures in 1..12 {
        let ceiling = backoff.ceiling(failures);
        for _ in 0..50 {
            let delay = backoff.delay(failures, &mut rng);
            assert!(delay <= ceiling, "{delay:?} > {ceiling:?}");
            assert!(
                delay + Duration::from_millis(1) >= ceiling.mul_f64(0.75),
                "{delay:?} too short"
            );
        }
    }
}

#[test]
fn zero_jitter_is_deterministic() {
    let backoff = Backoff {
        jitter_fraction: 0.0,
        ..backoff()
    };
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(backoff.delay(3, &mut rng), Duration::from_secs(8));
}
