use jiff::Timestamp;

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    use crate::clock::Clock;
    use jiff::Timestamp;

    /// A clock frozen at a fixed instant.
    #[derive(Debug, Clone, Copy)]
    pub(crate) struct TestClock {
        now: Timestamp,
    }

    impl TestClock {
        pub(crate) fn at_millis(millis: i64) -> Self {
            Self {
                now: Timestamp::from_millisecond(millis).unwrap(),
            }
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            self.now
        }
    }

    #[test]
    fn test_clock_is_frozen() {
        let clock = TestClock::at_millis(1_420_070_400_123);
        assert_eq!(clock.now().as_millisecond(), 1_420_070_400_123);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        use crate::clock::SystemClock;
        assert!(SystemClock.now().as_millisecond() > 1_577_836_800_000);
    }
}
