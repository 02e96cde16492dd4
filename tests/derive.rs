#![cfg(feature = "derive")]

mod support;

use cassette::{
    BaseType, Decoded, DecodingStrategy, Endianness,
    avec::{FromMessage, FromMessages, Options, Writer, decode_slice},
    sans::definition::Definition,
    types::profile::{File, Manufacturer, Sport},
};

use support::START;

#[derive(Debug, Default, FromMessages)]
struct Activity {
    #[message(0)]
    file_id: Option<FileId>,
    #[message(20)]
    records: Vec<Record>,
}

#[derive(Debug, Default, FromMessage)]
struct FileId {
    #[field(0)]
    type_: Option<File>,
    #[field(1)]
    manufacturer: Option<Manufacturer>,
    #[field(2)]
    product: Option<u16>,
    #[field(3)]
    serial_number: Option<u32>,
    #[field(4)]
    time_created: Option<u32>,
}

#[derive(Debug, Default, FromMessage)]
struct Record {
    #[field(time)]
    time_offset: Option<u8>,
    #[field(timestamp)]
    timestamp: Option<u32>,
    #[field(0)]
    position_lat: Option<i32>,
    #[field(2, scale = 5, offset = 500, base = uint16)]
    altitude: Option<f64>,
    #[field(5, scale = 100, accumulate)]
    distance: Option<f64>,
    #[field(6, |speeds, speed: u16| speeds.push(speed))]
    speeds: Vec<u16>,
    #[field(13)]
    temperature: Option<Decoded<i8>>,
}

#[test]
fn activity() {
    for endianness in [Endianness::Little, Endianness::Big] {
        let data = support::activity(endianness);
        let mut activity = Activity::default();
        decode_slice(&data, &mut activity, Options::default()).unwrap();

        let file_id = activity.file_id.unwrap();
        assert_eq!(file_id.type_, Some(File::Activity));
        assert_eq!(file_id.manufacturer, Some(Manufacturer::Garmin));
        assert_eq!(file_id.product, Some(3121));
        assert_eq!(file_id.serial_number, Some(3_987_654_321));
        assert_eq!(file_id.time_created, Some(START));

        let records = &activity.records;
        assert_eq!(records.len(), 4);

        let timestamps: Vec<_> = records.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, support::TIMESTAMPS.map(Some));

        let offsets: Vec<_> = records.iter().map(|r| r.time_offset).collect();
        assert_eq!(offsets, [None, None, Some(8), Some(2)]);

        let altitudes: Vec<_> = records.iter().map(|r| r.altitude).collect();
        assert_eq!(altitudes, [Some(520.0), None, Some(521.0), Some(522.0)]);

        let distances: Vec<_> = records.iter().map(|r| r.distance).collect();
        assert_eq!(distances, [Some(0.0), Some(12.5), Some(25.0), Some(37.5)]);

        assert_eq!(records[0].position_lat, Some(495_280_000));
        assert_eq!(records[0].speeds, [2500]);
        assert_eq!(records[1].speeds, [2600]);
        assert!(records[2].speeds.is_empty());

        assert_eq!(records[0].temperature, Some(Decoded::Valid(21)));
        assert_eq!(records[1].temperature, Some(Decoded::Valid(-3)));
        assert_eq!(records[2].temperature, None);
    }
}

#[derive(Debug, Default, FromMessages)]
struct Altitudes {
    #[message(20)]
    records: Vec<RawAltitude>,
}

#[derive(Debug, Default, FromMessage)]
struct RawAltitude {
    #[field(2)]
    altitude: Option<Decoded<u16>>,
}

#[test]
fn sentinels() {
    let data = support::activity(Endianness::Little);
    let options = Options::default().with_strategy(DecodingStrategy::SubstituteSentinel);

    let mut altitudes = Altitudes::default();
    decode_slice(&data, &mut altitudes, options).unwrap();

    let values: Vec<_> = altitudes.records.iter().map(|r| r.altitude).collect();
    assert_eq!(
        values,
        [
            Some(Decoded::Valid(3100)),
            Some(Decoded::Sentinel(0xFFFF)),
            Some(Decoded::Valid(3105)),
            Some(Decoded::Valid(3110)),
        ]
    );
}

#[derive(Debug, Default, FromMessages)]
struct Laps {
    #[message(19)]
    laps: Vec<Lap>,
}

#[derive(Debug, Default, FromMessage)]
struct Lap {
    #[field(5, accumulate)]
    cycles: Option<u64>,
}

#[test]
fn accumulated_rollover() {
    let mut writer = Writer::new();
    writer
        .define(0, Definition::new(19).with_field(5, 1, BaseType::Uint8))
        .unwrap();

    for cycles in [250u8, 4, 10] {
        writer.data(0).unwrap().field(5, &cycles).unwrap().finish();
    }

    let mut laps = Laps::default();
    decode_slice(&writer.finish().unwrap(), &mut laps, Options::default()).unwrap();

    let cycles: Vec<_> = laps.laps.iter().map(|l| l.cycles).collect();
    assert_eq!(cycles, [Some(250), Some(260), Some(266)]);
}

#[derive(Debug, Default, FromMessages)]
struct Courses {
    #[message(31)]
    course: Option<Course>,
}

#[derive(Debug, Default, FromMessage)]
struct Course {
    #[field(4)]
    sport: Option<Sport>,
    #[field(5, |names, name: String| names.push(name))]
    names: Vec<String>,
}

#[test]
fn later_messages_replace_earlier() {
    let mut writer = Writer::new();
    let definition = Definition::new(31)
        .with_field(4, 1, BaseType::Enum)
        .with_field(5, 16, BaseType::String);
    writer.define(0, definition).unwrap();

    writer
        .data(0)
        .unwrap()
        .field(4, &Sport::Cycling)
        .unwrap()
        .field(5, &String::from("Loop"))
        .unwrap()
        .finish();

    writer
        .data(0)
        .unwrap()
        .field(4, &Sport::Running)
        .unwrap()
        .field(5, &String::from("Trail"))
        .unwrap()
        .finish();

    let mut courses = Courses::default();
    decode_slice(&writer.finish().unwrap(), &mut courses, Options::default()).unwrap();

    let course = courses.course.unwrap();
    assert_eq!(course.sport, Some(Sport::Running));
    assert_eq!(course.names, ["Trail"]);
}

#[derive(Debug, Default, FromMessages)]
struct Timed {
    #[message(20)]
    records: Vec<Offsets>,
}

#[derive(Debug, Default, FromMessage)]
struct Offsets {
    #[field(time, |offsets, offset| offsets.push(offset))]
    offsets: Vec<u8>,
}

#[test]
fn time_offset_handler() {
    let data = support::activity(Endianness::Little);
    let mut timed = Timed::default();
    decode_slice(&data, &mut timed, Options::default()).unwrap();

    let offsets: Vec<_> = timed.records.iter().map(|r| r.offsets.clone()).collect();
    assert_eq!(offsets, [vec![], vec![], vec![8], vec![2]]);
}
