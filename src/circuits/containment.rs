//! Assertions that a selected window equals the claimed identity.

use std::fmt::Debug;

use bellpepper_core::{
    num::{AllocatedNum, Num},
    ConstraintSystem, LinearCombination, SynthesisError,
};
use ff::PrimeField;

use crate::circuits::window::Window;

pub trait ContainmentAssertion: Debug + Clone + Send + Sync {
    fn name(&self) -> &'static str;

    fn assert_contained<F, CS>(
        &self,
        cs: CS,
        window: &Window<F>,
        source: &[Num<F>],
        claimed: &[Num<F>],
    ) -> Result<(), SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>;
}

/// Position-weighted fingerprint check.
///
/// Asserts `Σ C[i]·(i + k) == Σ masked[j]·j`, where `k` is the window offset
/// and `j` ranges over absolute source positions. On genuine containment the
/// masked term at `j = k + i` is `C[i]`, so both sides agree. This costs two
/// constraints but is a probabilistic equality: distinct contents can collide
/// on the same field value. Position 0 carries weight zero, so at `k = 0` the
/// first byte is unconstrained; with `M = 1` any byte is accepted at offset 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSumContainment;

impl ContainmentAssertion for WeightedSumContainment {
    fn name(&self) -> &'static str {
        "weighted-sum containment"
    }

    fn assert_contained<F, CS>(
        &self,
        mut cs: CS,
        window: &Window<F>,
        _source: &[Num<F>],
        claimed: &[Num<F>],
    ) -> Result<(), SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>,
    {
        if claimed.len() != window.len {
            return Err(SynthesisError::Unsatisfiable);
        }

        // Σ C[i]·(i + k) = Σ i·C[i] + k·Σ C[i]; only the last term is quadratic.
        let claimed_sum = claimed
            .iter()
            .fold(LinearCombination::zero(), |acc, c| acc + &c.lc(F::ONE));
        let claimed_sum_value = claimed
            .iter()
            .try_fold(F::ZERO, |acc, c| c.get_value().map(|v| acc + v));
        let offset_weight = AllocatedNum::alloc(cs.namespace(|| "offset weight"), || {
            let k = window.offset.get_value();
            k.zip(claimed_sum_value)
                .map(|(k, sum)| k * sum)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        cs.enforce(
            || "offset times identity sum",
            |lc| lc + window.offset.get_variable(),
            |_| claimed_sum,
            |lc| lc + offset_weight.get_variable(),
        );

        let identity_acc = claimed
            .iter()
            .enumerate()
            .fold(
                LinearCombination::zero() + offset_weight.get_variable(),
                |acc, (i, c)| acc + &c.lc(F::from(i as u64)),
            );
        let window_acc = window
            .masked
            .iter()
            .enumerate()
            .fold(LinearCombination::zero(), |acc, (j, m)| {
                acc + (F::from(j as u64), m.get_variable())
            });

        cs.enforce(
            || "identity accumulator equals window accumulator",
            |_| identity_acc,
            |lc| lc + CS::one(),
            |_| window_acc,
        );
        Ok(())
    }
}

/// Element-wise check: for every candidate start `t` and every `i`,
/// `indicator[t] · (source[t + i] - C[i]) = 0`.
///
/// Sound, at the price of one constraint per (start, identity byte) pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerByteContainment;

impl ContainmentAssertion for PerByteContainment {
    fn name(&self) -> &'static str {
        "per-byte containment"
    }

    fn assert_contained<F, CS>(
        &self,
        mut cs: CS,
        window: &Window<F>,
        source: &[Num<F>],
        claimed: &[Num<F>],
    ) -> Result<(), SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>,
    {
        if claimed.len() != window.len || window.indicator.len() + window.len != source.len() + 1
        {
            return Err(SynthesisError::Unsatisfiable);
        }

        for (t, start) in window.indicator.iter().enumerate() {
            for (i, c) in claimed.iter().enumerate() {
                cs.enforce(
                    || format!("start {t} byte {i}"),
                    |_| start.lc(CS::one(), F::ONE),
                    |_| source[t + i].lc(F::ONE) - &c.lc(F::ONE),
                    |lc| lc,
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        circuits::{
            bytes::{alloc_bytes, byte_nums},
            window::{OneHotWindowSelector, WindowSelector},
        },
        Scalar,
    };
    use bellpepper_core::test_cs::TestConstraintSystem;
    use rand::{Rng, RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    type Cs = TestConstraintSystem<Scalar>;

    fn check<A: ContainmentAssertion>(
        assertion: A,
        token: &[u8],
        identity: &[u8],
        offset: u64,
    ) -> Cs {
        let mut cs = Cs::new();
        let token_bytes = alloc_bytes(cs.namespace(|| "token"), token.len(), Some(token)).unwrap();
        let identity_bytes =
            alloc_bytes(cs.namespace(|| "identity"), identity.len(), Some(identity)).unwrap();
        let source = byte_nums::<Scalar, Cs>(&token_bytes);
        let claimed = byte_nums::<Scalar, Cs>(&identity_bytes);
        let offset =
            AllocatedNum::alloc(cs.namespace(|| "offset"), || Ok(Scalar::from(offset))).unwrap();

        let window = OneHotWindowSelector
            .select(cs.namespace(|| "window"), &source, &offset, identity.len())
            .unwrap();
        assertion
            .assert_contained(cs.namespace(|| "containment"), &window, &source, &claimed)
            .unwrap();
        cs
    }

    #[test]
    fn fingerprint_accepts_genuine_containment() {
        let token = b"{\"sub\":\"alice\",\"aud\":\"x\"}";
        let offset = 8;
        let identity = &token[offset..offset + 5];
        assert_eq!(identity, b"alice");

        let cs = check(WeightedSumContainment, token, identity, offset as u64);
        assert!(cs.is_satisfied());
    }

    #[test]
    fn fingerprint_rejects_tampered_identity() {
        let token = b"{\"sub\":\"alice\",\"aud\":\"x\"}";
        let cs = check(WeightedSumContainment, token, b"alicf", 8);
        assert!(!cs.is_satisfied());
        assert_eq!(
            cs.which_is_unsatisfied(),
            Some("containment/identity accumulator equals window accumulator")
        );
    }

    #[test]
    fn fingerprint_rejects_random_wrong_offsets() {
        let mut rng = ChaCha20Rng::seed_from_u64(0x1d_0ff5e7);
        for _ in 0..64 {
            let token_len = rng.gen_range(8..48);
            let identity_len = rng.gen_range(4..=token_len / 2);
            let mut token = vec![0u8; token_len];
            rng.fill_bytes(&mut token);

            let offset = rng.gen_range(0..=token_len - identity_len);
            let identity = token[offset..offset + identity_len].to_vec();
            let wrong = loop {
                let candidate = rng.gen_range(0..=token_len - identity_len);
                if token[candidate..candidate + identity_len] != identity[..] {
                    break candidate;
                }
            };

            assert!(check(WeightedSumContainment, &token, &identity, offset as u64).is_satisfied());
            assert!(!check(WeightedSumContainment, &token, &identity, wrong as u64).is_satisfied());
        }
    }

    #[test]
    fn fingerprint_records_offset_weight() {
        let token = b"xxbobyy";
        let mut cs = check(WeightedSumContainment, token, b"bob", 2);
        assert!(cs.is_satisfied());
        let identity_sum = 2 * b'b' as u64 + b'o' as u64;
        assert_eq!(
            cs.get("containment/offset weight/num"),
            Scalar::from(2 * identity_sum)
        );
    }

    #[test]
    fn fingerprint_ignores_first_byte_at_offset_zero() {
        assert!(check(WeightedSumContainment, b"ab", b"b", 0).is_satisfied());
        assert!(!check(PerByteContainment, b"ab", b"b", 0).is_satisfied());
    }

    #[test]
    fn per_byte_matches_fingerprint_verdicts() {
        let token = b"iss=me;sub=twitter|337834122;aud=123";
        let offset = 11;
        let identity = &token[offset..offset + 17];
        assert_eq!(identity, b"twitter|337834122");

        assert!(check(PerByteContainment, token, identity, offset as u64).is_satisfied());
        assert!(!check(PerByteContainment, token, identity, offset as u64 + 1).is_satisfied());
    }

    #[test]
    fn fingerprint_uses_fewer_constraints() {
        let token = b"iss=me;sub=twitter|337834122;aud=123";
        let identity = &token[11..28];

        let weighted = check(WeightedSumContainment, token, identity, 11).num_constraints();
        let per_byte = check(PerByteContainment, token, identity, 11).num_constraints();
        let starts = token.len() - identity.len() + 1;
        assert_eq!(per_byte - weighted, starts * identity.len() - 2);
    }
}
