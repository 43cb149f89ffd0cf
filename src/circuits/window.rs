//! Selection of a contiguous window whose start offset is only known at witness time.

use std::fmt::Debug;

use bellpepper_core::{
    boolean::{AllocatedBit, Boolean},
    num::{AllocatedNum, Num},
    ConstraintSystem, LinearCombination, SynthesisError,
};
use ff::PrimeField;

/// The result of a dynamic window selection over a source sequence.
pub struct Window<F: PrimeField> {
    /// Start offset of the window.
    pub offset: AllocatedNum<F>,
    /// `indicator[t]` is set iff the window starts at `t`; exactly one entry is set.
    pub indicator: Vec<Boolean>,
    /// Source-aligned copy of the input with every element outside the window zeroed,
    /// so `masked[j] == source[j]` for `offset <= j < offset + len`.
    pub masked: Vec<AllocatedNum<F>>,
    pub len: usize,
}

pub trait WindowSelector: Debug + Clone + Send + Sync {
    fn name(&self) -> &'static str;

    fn select<F, CS>(
        &self,
        cs: CS,
        source: &[Num<F>],
        offset: &AllocatedNum<F>,
        len: usize,
    ) -> Result<Window<F>, SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>;
}

/// Window selection driven by a one-hot start indicator.
///
/// The indicator has one entry per admissible start, `0..=source.len() - len`,
/// so an offset that would run past the end of the source has no satisfying
/// assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneHotWindowSelector;

impl WindowSelector for OneHotWindowSelector {
    fn name(&self) -> &'static str {
        "one-hot window selector"
    }

    fn select<F, CS>(
        &self,
        mut cs: CS,
        source: &[Num<F>],
        offset: &AllocatedNum<F>,
        len: usize,
    ) -> Result<Window<F>, SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>,
    {
        if len == 0 || len > source.len() {
            return Err(SynthesisError::Unsatisfiable);
        }
        let starts = source.len() - len + 1;
        let offset_value = offset.get_value();

        let indicator = (0..starts)
            .map(|t| {
                let bit = offset_value.map(|k| k == F::from(t as u64));
                AllocatedBit::alloc(cs.namespace(|| format!("start indicator {t}")), bit)
                    .map(Boolean::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        cs.enforce(
            || "exactly one start",
            |_| sum_bits::<F, CS>(&indicator, |_| F::ONE),
            |lc| lc + CS::one(),
            |lc| lc + CS::one(),
        );
        cs.enforce(
            || "start indicator encodes offset",
            |_| sum_bits::<F, CS>(&indicator, |t| F::from(t as u64)),
            |lc| lc + CS::one(),
            |lc| lc + offset.get_variable(),
        );

        let masked = source
            .iter()
            .enumerate()
            .map(|(j, elem)| {
                // Position j lies inside the window iff the start is in [j + 1 - len, j].
                let first = (j + 1).saturating_sub(len);
                let last = j.min(starts - 1);
                let covering = &indicator[first..=last];

                let inside = covering
                    .iter()
                    .map(Boolean::get_value)
                    .try_fold(false, |acc, bit| bit.map(|b| acc || b));
                let value = inside.and_then(|inside| {
                    if inside {
                        elem.get_value()
                    } else {
                        Some(F::ZERO)
                    }
                });

                let out = AllocatedNum::alloc(cs.namespace(|| format!("masked {j}")), || {
                    value.ok_or(SynthesisError::AssignmentMissing)
                })?;
                cs.enforce(
                    || format!("mask position {j}"),
                    |_| sum_bits::<F, CS>(covering, |_| F::ONE),
                    |_| elem.lc(F::ONE),
                    |lc| lc + out.get_variable(),
                );
                Ok(out)
            })
            .collect::<Result<Vec<_>, SynthesisError>>()?;

        Ok(Window {
            offset: offset.clone(),
            indicator,
            masked,
            len,
        })
    }
}

/// `Σ weight(t) · bits[t]` as a linear combination.
fn sum_bits<F, CS>(bits: &[Boolean], weight: impl Fn(usize) -> F) -> LinearCombination<F>
where
    F: PrimeField,
    CS: ConstraintSystem<F>,
{
    bits.iter()
        .enumerate()
        .fold(LinearCombination::zero(), |acc, (t, bit)| {
            acc + &bit.lc(CS::one(), weight(t))
        })
}
