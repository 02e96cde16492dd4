//! A sample of the protocol's profile vocabularies.
//!
//! Only types referenced by the message layouts in this crate's tests and
//! documentation are declared here. Others are declared in the same way with
//! [`field_enum!`](crate::field_enum) and [`flag_set!`](crate::flag_set).

use alloc::vec::Vec;

use crate::{
    base::BaseType,
    codec::{Decoded, EncodeError, FieldCodec, FieldSlice},
    resolution::Resolution,
    validity::DecodingStrategy,
};

crate::field_enum! {
    /// The type of a file, from the `file_id` message.
    pub enum File: u8 {
        Device = 1,
        Settings = 2,
        Sport = 3,
        Activity = 4,
        Workout = 5,
        Course = 6,
        Schedules = 7,
        Weight = 9,
        Totals = 10,
        Goals = 11,
        BloodPressure = 14,
        MonitoringA = 15,
        ActivitySummary = 20,
        MonitoringDaily = 28,
        MonitoringB = 32,
        Segment = 34,
        SegmentList = 35,
    }
}

crate::field_enum! {
    pub enum Sport: u8 {
        Generic = 0,
        Running = 1,
        Cycling = 2,
        Transition = 3,
        FitnessEquipment = 4,
        Swimming = 5,
        Basketball = 6,
        Soccer = 7,
        Tennis = 8,
        AmericanFootball = 9,
        Training = 10,
        Walking = 11,
        CrossCountrySkiing = 12,
        AlpineSkiing = 13,
        Snowboarding = 14,
        Rowing = 15,
        Mountaineering = 16,
        Hiking = 17,
        Multisport = 18,
        Paddling = 19,
        All = 254,
    }
}

crate::field_enum! {
    pub enum Manufacturer: u16 {
        Garmin = 1,
        Zephyr = 3,
        Dayton = 4,
        Idt = 5,
        Srm = 6,
        Quarq = 7,
        Ibike = 8,
        Saris = 9,
        SparkHk = 10,
        Tanita = 11,
        Echowell = 12,
        DynastreamOem = 13,
        Nautilus = 14,
        Dynastream = 15,
        Timex = 16,
        Suunto = 23,
        Wahoo = 32,
        Stages = 69,
        Development = 255,
        Coros = 294,
    }
}

crate::flag_set! {
    /// Sports a device supports, first byte.
    pub struct SportBits0: u8 {
        const GENERIC = 0x01;
        const RUNNING = 0x02;
        const CYCLING = 0x04;
        /// Multisport transition.
        const TRANSITION = 0x08;
        const FITNESS_EQUIPMENT = 0x10;
        const SWIMMING = 0x20;
        const BASKETBALL = 0x40;
        const SOCCER = 0x80;
    }
}

crate::flag_set! {
    /// Sports a device supports, second byte.
    pub struct SportBits1: u8 {
        const TENNIS = 0x01;
        const AMERICAN_FOOTBALL = 0x02;
        const TRAINING = 0x04;
        const WALKING = 0x08;
        const CROSS_COUNTRY_SKIING = 0x10;
        const ALPINE_SKIING = 0x20;
        const SNOWBOARDING = 0x40;
        const ROWING = 0x80;
    }
}

crate::flag_set! {
    pub struct WorkoutCapabilities: u32 {
        const INTERVAL = 0x0000_0001;
        const CUSTOM = 0x0000_0002;
        const FITNESS_EQUIPMENT = 0x0000_0004;
        const FIRSTBEAT = 0x0000_0008;
        const NEW_LEAF = 0x0000_0010;
        /// For backwards compatibility. Watch should add missing id fields
        /// then clear flag.
        const TCX = 0x0000_0020;
        const SPEED = 0x0000_0080;
        const HEART_RATE = 0x0000_0100;
        const DISTANCE = 0x0000_0200;
        const CADENCE = 0x0000_0400;
        const POWER = 0x0000_0800;
        const GRADE = 0x0000_1000;
        const RESISTANCE = 0x0000_2000;
        const PROTECTED = 0x0000_4000;
    }
}

/// The sports a device supports, carried by a `uint8` array field of the
/// `sport_capabilities`-style messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SportCapabilities {
    pub sports_0: SportBits0,
    pub sports_1: SportBits1,
}

impl SportCapabilities {
    pub const fn empty() -> Self {
        Self {
            sports_0: SportBits0::empty(),
            sports_1: SportBits1::empty(),
        }
    }

    /// The raw bytes of each component, in wire order.
    pub fn components(&self) -> [u8; 2] {
        [self.sports_0.bits(), self.sports_1.bits()]
    }
}

impl FieldCodec for SportCapabilities {
    fn encode(&self, base: BaseType, _: Resolution) -> Result<Vec<u8>, EncodeError> {
        if !base.is_unsigned_of(1) {
            Err(EncodeError::Incompatible { base })?;
        }

        Ok(self.components().to_vec())
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        if slice.is_malformed() || slice.count() != 2 {
            return None;
        }

        let mut elements = slice.elements();
        let (first, second) = (elements.next()?, elements.next()?);

        let sports_0 = SportBits0::decode(&first, DecodingStrategy::SubstituteSentinel)?;
        let sports_1 = SportBits1::decode(&second, DecodingStrategy::SubstituteSentinel)?;

        let valid = sports_0.is_valid() || sports_1.is_valid();
        let value = Self {
            sports_0: sports_0.into_inner(),
            sports_1: sports_1.into_inner(),
        };

        match (valid, strategy) {
            (true, _) => Some(Decoded::Valid(value)),
            (false, DecodingStrategy::SubstituteSentinel) => Some(Decoded::Sentinel(value)),
            (false, DecodingStrategy::DropInvalid) => None,
        }
    }
}
