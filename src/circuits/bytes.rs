use bellpepper_core::{
    boolean::{AllocatedBit, Boolean},
    num::Num,
    ConstraintSystem, SynthesisError,
};
use ff::PrimeField;

/// A byte held in the circuit as eight boolean-constrained bits, most
/// significant bit first (the bit order the SHA-256 gadget consumes).
#[derive(Debug, Clone)]
pub struct AllocatedByte {
    bits: Vec<Boolean>,
}

impl AllocatedByte {
    pub fn alloc<F, CS>(mut cs: CS, value: Option<u8>) -> Result<Self, SynthesisError>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>,
    {
        let bits = (0..8)
            .map(|i| {
                let bit = value.map(|v| (v >> (7 - i)) & 1 == 1);
                AllocatedBit::alloc(cs.namespace(|| format!("bit {i}")), bit).map(Boolean::from)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }

    /// Wrap eight bits produced by another gadget. Returns `None` for any other length.
    pub fn from_bits(bits: &[Boolean]) -> Option<Self> {
        (bits.len() == 8).then(|| Self {
            bits: bits.to_vec(),
        })
    }

    pub fn bits(&self) -> &[Boolean] {
        &self.bits
    }

    pub fn value(&self) -> Option<u8> {
        self.bits.iter().try_fold(0u8, |acc, bit| {
            bit.get_value().map(|b| (acc << 1) | u8::from(b))
        })
    }

    /// The byte as a field element, `Σ bit_i · 2^(7-i)`, without new constraints.
    pub fn num<F, CS>(&self) -> Num<F>
    where
        F: PrimeField,
        CS: ConstraintSystem<F>,
    {
        self.bits
            .iter()
            .enumerate()
            .fold(Num::zero(), |num, (i, bit)| {
                num.add_bool_with_coeff(CS::one(), bit, F::from(1u64 << (7 - i)))
            })
    }
}

/// Allocate `len` private bytes, taking values from `values` when a witness is present.
pub fn alloc_bytes<F, CS>(
    mut cs: CS,
    len: usize,
    values: Option<&[u8]>,
) -> Result<Vec<AllocatedByte>, SynthesisError>
where
    F: PrimeField,
    CS: ConstraintSystem<F>,
{
    if let Some(values) = values {
        if values.len() != len {
            return Err(SynthesisError::Unsatisfiable);
        }
    }
    (0..len)
        .map(|i| {
            AllocatedByte::alloc(
                cs.namespace(|| format!("byte {i}")),
                values.map(|v| v[i]),
            )
        })
        .collect()
}

/// Field-element view of a byte sequence.
pub fn byte_nums<F, CS>(bytes: &[AllocatedByte]) -> Vec<Num<F>>
where
    F: PrimeField,
    CS: ConstraintSystem<F>,
{
    bytes.iter().map(|b| b.num::<F, CS>()).collect()
}
