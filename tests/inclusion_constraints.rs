use bellpepper_core::test_cs::TestConstraintSystem;
use inclusion_spartan2::{
    utils::sha256_bytes, CircuitShape, InclusionCircuit, InclusionWitness, PerByteContainment,
    Scalar, DIGEST_LEN,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const TOKEN: &str = r#"{"iss":"https://dev-9h47ajc9.us.au111th0.com/","sub":"twitter|337834122","aud":"123","iat":1639173028,"exp":1639209028,"nonce":"44017a89"}"#;
const IDENTITY: &str = "twitter|337834122";
const IDENTITY_OFFSET: u64 = 54;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn sample_witness() -> InclusionWitness {
    InclusionWitness::new(
        TOKEN.as_bytes().to_vec(),
        IDENTITY.as_bytes().to_vec(),
        IDENTITY_OFFSET,
    )
}

fn synthesize(witness: InclusionWitness) -> TestConstraintSystem<Scalar> {
    let circuit = InclusionCircuit::for_witness(witness).unwrap();
    let mut cs = TestConstraintSystem::<Scalar>::new();
    circuit.define(&mut cs).unwrap();
    cs
}

fn with_offset(offset: u64) -> InclusionWitness {
    let mut witness = sample_witness();
    witness.identity_offset = offset;
    witness
}

#[test]
fn sample_token_is_satisfied() {
    init_tracing();
    let witness = sample_witness();
    assert_eq!(witness.token.len(), 138);
    let public = witness.public_inputs().to_scalars::<Scalar>();

    let cs = synthesize(witness);
    assert!(cs.is_satisfied());
    assert_eq!(cs.num_inputs(), 1 + 2 * DIGEST_LEN);
    assert!(cs.verify(&public));
}

#[test]
fn sample_token_rejects_wrong_public_digest() {
    init_tracing();
    let witness = sample_witness();
    let mut public = witness.public_inputs().to_scalars::<Scalar>();
    public[DIGEST_LEN] += Scalar::from(1u64);

    let cs = synthesize(witness);
    assert!(cs.is_satisfied());
    assert!(!cs.verify(&public));
}

#[test]
fn neighbouring_offsets_are_rejected() {
    init_tracing();
    for offset in [IDENTITY_OFFSET - 1, IDENTITY_OFFSET + 1] {
        let cs = synthesize(with_offset(offset));
        assert!(!cs.is_satisfied(), "offset {offset} accepted");
        assert!(cs
            .which_is_unsatisfied()
            .unwrap()
            .starts_with("identity containment/"));
    }
}

#[test]
fn boundary_offsets_are_rejected() {
    init_tracing();
    let last_start = (TOKEN.len() - IDENTITY.len()) as u64;
    for offset in [0, last_start] {
        let cs = synthesize(with_offset(offset));
        assert!(!cs.is_satisfied(), "offset {offset} accepted");
    }

    let cs = synthesize(with_offset(last_start + 1));
    assert!(!cs.is_satisfied());
    assert!(cs
        .which_is_unsatisfied()
        .unwrap()
        .starts_with("identity window/"));
}

#[test]
fn flipped_token_byte_breaks_token_digest() {
    init_tracing();
    let mut witness = sample_witness();
    witness.token[0] ^= 0x01;

    let cs = synthesize(witness);
    assert!(!cs.is_satisfied());
    assert!(cs
        .which_is_unsatisfied()
        .unwrap()
        .starts_with("token digest check/"));
}

#[test]
fn tampered_identity_breaks_identity_digest() {
    init_tracing();
    let mut witness = sample_witness();
    let tampered = b"twitter|337834123".to_vec();
    witness.claimed_identity_digest = sha256_bytes(IDENTITY.as_bytes());
    witness.claimed_identity = tampered;

    let cs = synthesize(witness);
    assert!(!cs.is_satisfied());
}

#[test]
fn empty_token_and_identity_are_satisfied() {
    init_tracing();
    let witness = InclusionWitness::new(Vec::new(), Vec::new(), 0);
    assert_eq!(witness.token_digest, sha256_bytes(b""));
    assert_eq!(
        witness.shape(),
        CircuitShape {
            token_len: 0,
            identity_len: 0
        }
    );

    let public = witness.public_inputs().to_scalars::<Scalar>();
    let cs = synthesize(witness);
    assert!(cs.is_satisfied());
    assert!(cs.verify(&public));
}

#[test]
fn empty_identity_in_non_empty_token_is_satisfied() {
    init_tracing();
    let witness = InclusionWitness::new(b"hello".to_vec(), Vec::new(), 0);
    assert!(synthesize(witness).is_satisfied());
}

#[test]
fn identity_filling_the_whole_token_is_satisfied() {
    init_tracing();
    let witness = InclusionWitness::from_token(b"alice".to_vec(), b"alice".to_vec()).unwrap();
    assert_eq!(witness.identity_offset, 0);
    assert!(synthesize(witness).is_satisfied());
}

/// Integer form of the fingerprint equation `Σ C[i]·(i + k) == Σ T[k + i]·(k + i)`.
fn fingerprint_balances(token: &[u8], identity: &[u8], offset: usize) -> bool {
    let claimed: u64 = identity
        .iter()
        .enumerate()
        .map(|(i, &c)| c as u64 * (i + offset) as u64)
        .sum();
    let window: u64 = token[offset..offset + identity.len()]
        .iter()
        .enumerate()
        .map(|(i, &t)| t as u64 * (i + offset) as u64)
        .sum();
    claimed == window
}

fn satisfied_at(token: &[u8], identity: &[u8], offset: u64, per_byte: bool) -> bool {
    let witness = InclusionWitness::new(token.to_vec(), identity.to_vec(), offset);
    let circuit = InclusionCircuit::for_witness(witness).unwrap();
    let mut cs = TestConstraintSystem::<Scalar>::new();
    if per_byte {
        circuit
            .with_containment(PerByteContainment)
            .define(&mut cs)
            .unwrap();
    } else {
        circuit.define(&mut cs).unwrap();
    }
    cs.is_satisfied()
}

#[test]
fn random_wrong_offsets_follow_the_fingerprint_equation() {
    init_tracing();
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed_70c3);

    for _ in 0..4 {
        let token_len = rng.gen_range(4..24);
        let identity_len = rng.gen_range(2..=3);
        let token: Vec<u8> = (0..token_len).map(|_| rng.gen_range(b'a'..=b'z')).collect();
        let start = rng.gen_range(0..=token_len - identity_len);
        let identity = token[start..start + identity_len].to_vec();

        assert!(satisfied_at(&token, &identity, start as u64, false));

        // Offset 0 gives the first byte zero weight, so only later starts are sampled.
        let wrong: Vec<usize> = (1..=token_len - identity_len)
            .filter(|&t| token[t..t + identity_len] != identity[..])
            .take(2)
            .collect();
        for t in wrong {
            let accepted = satisfied_at(&token, &identity, t as u64, false);
            assert_eq!(
                accepted,
                fingerprint_balances(&token, &identity, t),
                "offset {t} for {token:?}"
            );
            assert!(
                !satisfied_at(&token, &identity, t as u64, true),
                "per-byte accepted offset {t} for {token:?}"
            );
        }
    }
}

#[test]
fn single_byte_identity_at_offset_zero_passes_fingerprint_only() {
    init_tracing();
    assert!(fingerprint_balances(b"ab", b"b", 0));
    assert!(satisfied_at(b"ab", b"b", 0, false));
    assert!(!satisfied_at(b"ab", b"b", 0, true));
}
