#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::harness::Tamper;
    use crate::identity::IdentityCertificate;
    use crate::session::{ClientSession, ServerSession};
    use crate::wire::WireMessage;

    proptest! {
        // Arbitrary bytes off the network never panic the decoder, and any
        // frame it accepts re-encodes to the same bytes.
        #[test]
        fn test_wire_decode_total(frame in proptest::collection::vec(any::<u8>(), 0..80)) {
            if let Ok(msg) = WireMessage::decode(&frame) {
                let encoded = msg.encode();
                prop_assert_eq!(encoded.as_ref(), frame.as_slice());
            }
        }

        #[test]
        fn test_sessions_agree_for_any_certificates(
            client_der in proptest::collection::vec(any::<u8>(), 1..300),
            server_der in proptest::collection::vec(any::<u8>(), 1..300),
        ) {
            let client_cert = IdentityCertificate::from_der(client_der);
            let server_cert = IdentityCertificate::from_der(server_der);

            let (mut client, m1) = ClientSession::start(client_cert.clone(), server_cert.clone());
            let mut server = ServerSession::new(server_cert, client_cert);

            let m2 = server.handle_message(m1).unwrap().unwrap();
            let m3 = client.handle_message(m2).unwrap().unwrap();
            prop_assert!(server.handle_message(m3).unwrap().is_none());
            prop_assert_eq!(client.short_authentication_code(), server.short_authentication_code());
        }

        #[test]
        fn test_corrupted_opening_always_rejected(
            der in proptest::collection::vec(any::<u8>(), 1..300),
        ) {
            let cert = IdentityCertificate::from_der(der);
            let (mut client, m1) = ClientSession::start(cert.clone(), cert.clone());
            let mut server = ServerSession::new(cert.clone(), cert);

            let m2 = server.handle_message(m1).unwrap().unwrap();
            let m3 = match client.handle_message(m2).unwrap().unwrap() {
                WireMessage::ClientRandom(r) => WireMessage::ClientRandom(Tamper::CorruptClientRandom.relay_client_random(r)),
                other => other,
            };
            prop_assert!(server.handle_message(m3).is_err());
            prop_assert!(server.short_authentication_code().is_none());
        }
    }
}
