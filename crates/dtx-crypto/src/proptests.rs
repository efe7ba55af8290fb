#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::commitment::Commitment;
    use crate::nonce::{RandomNonce, NONCE_LEN};
    use crate::sas::ShortAuthenticationCode;
    use crate::transcript::Transcript;

    proptest! {
        #[test]
        fn test_transcript_determinism(
            tag1 in any::<u32>(),
            data1 in any::<Vec<u8>>(),
            tag2 in any::<u32>(),
            data2 in any::<Vec<u8>>()
        ) {
            let mut t1 = Transcript::new("test");
            t1.append_bytes(tag1, &data1);
            t1.append_bytes(tag2, &data2);

            let mut t2 = Transcript::new("test");
            t2.append_bytes(tag1, &data1);
            t2.append_bytes(tag2, &data2);

            prop_assert_eq!(t1.finalize(), t2.finalize());
        }

        // Moving bytes across a field boundary never yields the same framing.
        #[test]
        fn test_transcript_boundaries_unambiguous(
            data in proptest::collection::vec(any::<u8>(), 2..64),
            split_a in 0usize..64,
            split_b in 0usize..64,
        ) {
            let a = split_a % data.len();
            let b = split_b % data.len();
            prop_assume!(a != b);

            let mut t1 = Transcript::new("split");
            t1.append_bytes(1, &data[..a]).append_bytes(2, &data[a..]);
            let mut t2 = Transcript::new("split");
            t2.append_bytes(1, &data[..b]).append_bytes(2, &data[b..]);

            prop_assert_ne!(t1.as_bytes(), t2.as_bytes());
        }

        #[test]
        fn test_commitment_opens(
            cert in proptest::collection::vec(any::<u8>(), 1..512),
            nonce in any::<[u8; NONCE_LEN]>()
        ) {
            let nonce = RandomNonce::from_bytes(nonce);
            let c = Commitment::compute(&cert, &nonce);
            prop_assert!(c.verify(&cert, &nonce));
        }

        #[test]
        fn test_commitment_binds_nonce(
            cert in proptest::collection::vec(any::<u8>(), 1..512),
            nonce in any::<[u8; NONCE_LEN]>(),
            flip in 0usize..NONCE_LEN
        ) {
            let committed = RandomNonce::from_bytes(nonce);
            let mut other = nonce;
            other[flip] ^= 0x01;
            let c = Commitment::compute(&cert, &committed);
            prop_assert!(!c.verify(&cert, &RandomNonce::from_bytes(other)));
        }

        #[test]
        fn test_sas_deterministic(
            server_cert in proptest::collection::vec(any::<u8>(), 0..256),
            client_cert in proptest::collection::vec(any::<u8>(), 0..256),
            sr in any::<[u8; NONCE_LEN]>(),
            cr in any::<[u8; NONCE_LEN]>()
        ) {
            let sr = RandomNonce::from_bytes(sr);
            let cr = RandomNonce::from_bytes(cr);
            let a = ShortAuthenticationCode::derive(&server_cert, &client_cert, &sr, &cr);
            let b = ShortAuthenticationCode::derive(&server_cert, &client_cert, &sr, &cr);
            prop_assert_eq!(a, b);
            prop_assert!(a.value() < 1_000_000);
            prop_assert_eq!(a.to_string().len(), 6);
        }
    }
}
