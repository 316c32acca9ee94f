use super::{TypeKind, Val};
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Typed arithmetic
///
/// Every operation works in the `kind` it is given; operands are
/// converted to it first. Integral arithmetic wraps.

pub struct Operation {}

impl Operation {
    pub fn sum(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Operation::binary(
            kind,
            lhs,
            rhs,
            |l, r| Some(l.wrapping_add(r)),
            |l, r| Some(l.wrapping_add(r)),
            |l, r| Some(l.wrapping_add(r)),
            |l, r| l + r,
        )
    }

    pub fn subtract(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Operation::binary(
            kind,
            lhs,
            rhs,
            |l, r| Some(l.wrapping_sub(r)),
            |l, r| Some(l.wrapping_sub(r)),
            |l, r| Some(l.wrapping_sub(r)),
            |l, r| l - r,
        )
    }

    pub fn multiply(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Operation::binary(
            kind,
            lhs,
            rhs,
            |l, r| Some(l.wrapping_mul(r)),
            |l, r| Some(l.wrapping_mul(r)),
            |l, r| Some(l.wrapping_mul(r)),
            |l, r| l * r,
        )
    }

    pub fn divide(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Operation::binary(
            kind,
            lhs,
            rhs,
            |l, r| if r == 0 { None } else { Some(l.wrapping_div(r)) },
            |l, r| if r == 0 { None } else { Some(l.wrapping_div(r)) },
            |l, r| if r == 0 { None } else { Some(l.wrapping_div(r)) },
            |l, r| l / r,
        )
    }

    pub fn negate(kind: TypeKind, val: Val) -> Result<Val> {
        Ok(match kind {
            TypeKind::Char => Val::Char(val.to_char().wrapping_neg()),
            TypeKind::Int => Val::Int(val.to_int().wrapping_neg()),
            TypeKind::Float => Val::Float(-val.to_float()),
            TypeKind::Addr => Val::Addr(val.to_addr().wrapping_neg()),
        })
    }

    pub fn and(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(kind, !lhs.is_zero() && !rhs.is_zero()))
    }

    pub fn or(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from_bool(kind, !lhs.is_zero() || !rhs.is_zero()))
    }

    pub fn not(kind: TypeKind, val: Val) -> Result<Val> {
        Ok(Val::from_bool(kind, val.is_zero()))
    }

    pub fn equal(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Operation::compare(kind, lhs, rhs, |o| o == Ordering::Equal))
    }

    pub fn less(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Operation::compare(kind, lhs, rhs, |o| o == Ordering::Less))
    }

    pub fn less_equal(kind: TypeKind, lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Operation::compare(kind, lhs, rhs, |o| o != Ordering::Greater))
    }

    pub fn bit_and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Int(lhs.to_int() & rhs.to_int()))
    }

    pub fn bit_or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Int(lhs.to_int() | rhs.to_int()))
    }

    pub fn bit_xor(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Int(lhs.to_int() ^ rhs.to_int()))
    }

    pub fn bit_not(val: Val) -> Result<Val> {
        Ok(Val::Int(!val.to_int()))
    }

    pub fn shift_left(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Int(lhs.to_int().wrapping_shl(rhs.to_int() as u32)))
    }

    pub fn shift_right(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Int(lhs.to_int().wrapping_shr(rhs.to_int() as u32)))
    }

    pub fn modulus(lhs: Val, rhs: Val) -> Result<Val> {
        match rhs.to_int() {
            0 => Err(error!(DivisionByZero)),
            r => Ok(Val::Int(lhs.to_int().wrapping_rem(r))),
        }
    }

    /// Reads `val` as `from`, then converts it to `to`.
    pub fn cast(from: TypeKind, to: TypeKind, val: Val) -> Val {
        val.convert(from).convert(to)
    }

    #[allow(clippy::too_many_arguments)]
    fn binary(
        kind: TypeKind,
        lhs: Val,
        rhs: Val,
        char_op: fn(u8, u8) -> Option<u8>,
        int_op: fn(i32, i32) -> Option<i32>,
        addr_op: fn(u32, u32) -> Option<u32>,
        float_op: fn(f32, f32) -> f32,
    ) -> Result<Val> {
        let val = match kind {
            TypeKind::Char => char_op(lhs.to_char(), rhs.to_char()).map(Val::Char),
            TypeKind::Int => int_op(lhs.to_int(), rhs.to_int()).map(Val::Int),
            TypeKind::Addr => addr_op(lhs.to_addr(), rhs.to_addr()).map(Val::Addr),
            TypeKind::Float => Some(Val::Float(float_op(lhs.to_float(), rhs.to_float()))),
        };
        match val {
            Some(val) => Ok(val),
            None => Err(error!(DivisionByZero)),
        }
    }

    fn compare(kind: TypeKind, lhs: Val, rhs: Val, test: fn(Ordering) -> bool) -> Val {
        let ordering = match kind {
            TypeKind::Char => lhs.to_char().partial_cmp(&rhs.to_char()),
            TypeKind::Int => lhs.to_int().partial_cmp(&rhs.to_int()),
            TypeKind::Addr => lhs.to_addr().partial_cmp(&rhs.to_addr()),
            TypeKind::Float => lhs.to_float().partial_cmp(&rhs.to_float()),
        };
        Val::from_bool(kind, ordering.map_or(false, test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_sum_in_target_kind() {
        let v = Operation::sum(TypeKind::Int, Val::Int(2), Val::Int(3));
        assert_eq!(v, Ok(Val::Int(5)));
        let v = Operation::sum(TypeKind::Float, Val::Int(2), Val::Float(0.5));
        assert_eq!(v, Ok(Val::Float(2.5)));
        let v = Operation::sum(TypeKind::Char, Val::Char(250), Val::Char(10));
        assert_eq!(v, Ok(Val::Char(4)));
    }

    #[test]
    fn test_integral_division_by_zero() {
        let e = Operation::divide(TypeKind::Int, Val::Int(1), Val::Int(0));
        assert_eq!(e.err().map(|e| e.code()), Some(ErrorCode::DivisionByZero));
        let e = Operation::modulus(Val::Int(1), Val::Int(0));
        assert_eq!(e.err().map(|e| e.code()), Some(ErrorCode::DivisionByZero));
        let v = Operation::divide(TypeKind::Float, Val::Float(1.0), Val::Float(0.0));
        assert_eq!(v, Ok(Val::Float(f32::INFINITY)));
        let v = Operation::divide(TypeKind::Int, Val::Int(i32::MIN), Val::Int(-1));
        assert_eq!(v, Ok(Val::Int(i32::MIN)));
    }

    #[test]
    fn test_logic_results_in_target_kind() {
        assert_eq!(Operation::less(TypeKind::Float, Val::Int(1), Val::Int(2)), Ok(Val::Float(1.0)));
        assert_eq!(Operation::equal(TypeKind::Char, Val::Int(1), Val::Int(2)), Ok(Val::Char(0)));
        assert_eq!(Operation::less_equal(TypeKind::Int, Val::Int(2), Val::Int(2)), Ok(Val::Int(1)));
        assert_eq!(Operation::and(TypeKind::Int, Val::Float(0.5), Val::Int(3)), Ok(Val::Int(1)));
        assert_eq!(Operation::or(TypeKind::Int, Val::Int(0), Val::Char(0)), Ok(Val::Int(0)));
        assert_eq!(Operation::not(TypeKind::Addr, Val::Addr(0)), Ok(Val::Addr(1)));
    }

    #[test]
    fn test_integer_ops() {
        assert_eq!(Operation::bit_and(Val::Int(6), Val::Int(3)), Ok(Val::Int(2)));
        assert_eq!(Operation::bit_not(Val::Int(0)), Ok(Val::Int(-1)));
        assert_eq!(Operation::shift_left(Val::Int(1), Val::Int(4)), Ok(Val::Int(16)));
        assert_eq!(Operation::shift_right(Val::Int(-16), Val::Int(2)), Ok(Val::Int(-4)));
        assert_eq!(Operation::modulus(Val::Int(-7), Val::Int(3)), Ok(Val::Int(-1)));
    }

    #[test]
    fn test_cast() {
        let v = Operation::cast(TypeKind::Float, TypeKind::Int, Val::Float(3.99));
        assert_eq!(v, Val::Int(3));
        let v = Operation::cast(TypeKind::Char, TypeKind::Int, Val::Char(b'a'));
        assert_eq!(v, Val::Int(97));
    }
}
