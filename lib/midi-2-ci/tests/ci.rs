//! End-to-end MIDI-CI scenarios: a message built with the [`builder`] decodes
//! back through the [`dispatcher`] to an equal record, boundary behaviors
//! from the error-handling table are exercised at the dispatcher API rather
//! than against its internal segment machine.

use midi_2_ci::{
    builder,
    dispatcher::{
        CiDispatcher,
        Handlers,
    },
    header::{
        Header,
        ENVELOPE_LEN,
    },
    le7::Muid,
    message::management,
};

#[derive(Default)]
struct Recorder {
    discoveries: Vec<management::Discovery>,
    rejected_muid_checks: usize,
    overflows: usize,
}

impl Handlers for Recorder {
    fn check_muid(&mut self, _group: u8, _destination_muid: Muid) -> bool {
        self.rejected_muid_checks += 1;
        false
    }

    fn discovery(&mut self, _header: Header, message: management::Discovery) {
        self.discoveries.push(message);
    }

    fn buffer_overflow(&mut self, _capacity: usize) {
        self.overflows += 1;
    }
}

fn push_payload(dispatcher: &mut CiDispatcher<Recorder>, group: u8, device_id: u8, encoded: &[u8]) {
    dispatcher.start_sysex7(group, device_id);
    // The builder's envelope (0x7E, device_id, 0x0D) belongs to the sysex
    // transport, not the dispatcher's byte stream.
    dispatcher.push_bytes(&encoded[ENVELOPE_LEN..]);
}

#[test]
fn discovery_round_trips_through_builder_and_dispatcher() {
    let header = Header::new(0x7f, 0x02, Muid::new(0x1234_5678), Muid::BROADCAST);
    let body = management::Discovery {
        manufacturer: [0x12, 0x23, 0x34],
        family: 0x1779,
        model: 0x2b5d,
        version: [0x01, 0x00, 0x00, 0x00],
        capability: 0x7f,
        max_sysex_size: 256,
        output_path_id: 0,
    };

    let mut out = [0u8; 64];
    let len = builder::discovery(&mut out, &header, &body).unwrap();

    let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());
    push_payload(&mut dispatcher, 0, 0x7f, &out[..len]);

    assert_eq!(dispatcher.handlers().discoveries.len(), 1);
    let decoded = &dispatcher.handlers().discoveries[0];
    assert_eq!(decoded.manufacturer, body.manufacturer);
    assert_eq!(decoded.family, body.family);
    assert_eq!(decoded.model, body.model);
    assert_eq!(decoded.version, body.version);
    assert_eq!(decoded.capability, body.capability);
    assert_eq!(decoded.max_sysex_size, body.max_sysex_size);
}

#[test]
fn broadcast_destination_bypasses_check_muid() {
    let header = Header::new(0x7f, 0x02, Muid::new(1), Muid::BROADCAST);
    let body = management::Discovery {
        manufacturer: [0, 0, 0],
        family: 0,
        model: 0,
        version: [0, 0, 0, 0],
        capability: 0,
        max_sysex_size: 0,
        output_path_id: 0,
    };
    let mut out = [0u8; 64];
    let len = builder::discovery(&mut out, &header, &body).unwrap();

    let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());
    push_payload(&mut dispatcher, 0, 0x7f, &out[..len]);

    // `check_muid` always rejects here, yet the broadcast destination never
    // calls it, so the message still decodes.
    assert_eq!(dispatcher.handlers().rejected_muid_checks, 0);
    assert_eq!(dispatcher.handlers().discoveries.len(), 1);
}

#[test]
fn a_non_broadcast_destination_is_filtered_through_check_muid() {
    let header = Header::new(0x7f, 0x02, Muid::new(1), Muid::new(2));
    let body = management::Discovery {
        manufacturer: [0, 0, 0],
        family: 0,
        model: 0,
        version: [0, 0, 0, 0],
        capability: 0,
        max_sysex_size: 0,
        output_path_id: 0,
    };
    let mut out = [0u8; 64];
    let len = builder::discovery(&mut out, &header, &body).unwrap();

    let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());
    push_payload(&mut dispatcher, 0, 0x7f, &out[..len]);

    assert_eq!(dispatcher.handlers().rejected_muid_checks, 1);
    assert!(dispatcher.handlers().discoveries.is_empty());
}

#[test]
fn buffer_overflow_reports_once_and_emits_no_message() {
    let header = Header::new(0x7f, 0x02, Muid::new(1), Muid::BROADCAST);
    let body = management::EndpointInfoReply {
        status: 0,
        information: &[0xaa; 32],
    };
    let mut out = [0u8; 64];
    let len = builder::endpoint_info_reply(&mut out, &header, &body).unwrap();

    let mut dispatcher = CiDispatcher::<Recorder, 8>::new(Recorder::default());
    push_payload(&mut dispatcher, 0, 0x7f, &out[..len]);

    assert_eq!(dispatcher.handlers().overflows, 1);
    assert!(dispatcher.handlers().discoveries.is_empty());
}
