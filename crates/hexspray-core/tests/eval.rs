//! Tests for the address expression evaluator

use std::collections::HashMap;

use hexspray_core::error::UserInputError;
use hexspray_core::eval::evaluate;

fn regs(pairs: &[(&str, &str)]) -> HashMap<String, String>
{
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

#[test]
fn test_plain_hex_literal()
{
    let result = evaluate("1000", &HashMap::new()).unwrap();
    assert_eq!(result.value(), 0x1000);
}

#[test]
fn test_prefixed_hex_literal()
{
    let result = evaluate("0x1000", &HashMap::new()).unwrap();
    assert_eq!(result.value(), 0x1000);
}

#[test]
fn test_output_is_sixteen_digits()
{
    let result = evaluate("ff", &HashMap::new()).unwrap();
    assert_eq!(result.hex_digits(), "00000000000000ff");
}

#[test]
fn test_addition_and_multiplication_precedence()
{
    // 2 + 3 * 4 = 0xe under standard precedence
    let result = evaluate("2+3*4", &HashMap::new()).unwrap();
    assert_eq!(result.value(), 0xe);
}

#[test]
fn test_literals_are_hex_without_prefix()
{
    let result = evaluate("a*2", &HashMap::new()).unwrap();
    assert_eq!(result.value(), 0x14);
}

#[test]
fn test_register_substitution()
{
    let result = evaluate("rax+8", &regs(&[("rax", "0x0000000000001000")])).unwrap();
    assert_eq!(result.value(), 0x1008);
}

#[test]
fn test_substitution_is_case_insensitive()
{
    let result = evaluate("RAX", &regs(&[("rax", "0x10")])).unwrap();
    assert_eq!(result.value(), 0x10);
}

#[test]
fn test_longest_register_name_substituted_first()
{
    // 'si' is a prefix of 'sil'; 'sil+1' must resolve the longer name.
    let result = evaluate("sil+1", &regs(&[("si", "0x1"), ("sil", "0x2")])).unwrap();
    assert_eq!(result.value(), 0x3);
}

#[test]
fn test_character_outside_alphabet_rejected()
{
    let error = evaluate("rax?", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::InvalidExpression);
}

#[test]
fn test_whitespace_rejected()
{
    let error = evaluate("0x10 + 0x20", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::InvalidExpression);
}

#[test]
fn test_parentheses_rejected()
{
    let error = evaluate("(1+2)*3", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::InvalidExpression);
}

#[test]
fn test_negative_result_rejected()
{
    let error = evaluate("0x10-0x20", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::NegativeAddress);
}

#[test]
fn test_unary_minus_allowed_when_result_non_negative()
{
    let result = evaluate("-1+2", &HashMap::new()).unwrap();
    assert_eq!(result.value(), 1);
}

#[test]
fn test_empty_expression_is_parse_failure()
{
    let error = evaluate("", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::ParseFailure);
}

#[test]
fn test_dangling_operator_is_parse_failure()
{
    let error = evaluate("1+", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::ParseFailure);
}

#[test]
fn test_bare_prefix_is_parse_failure()
{
    let error = evaluate("0x", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::ParseFailure);
}

#[test]
fn test_embedded_x_is_parse_failure()
{
    let error = evaluate("10x10", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::ParseFailure);
}

#[test]
fn test_overflow_is_parse_failure()
{
    let wide = "ffffffffffffffff";
    let error = evaluate(&format!("{wide}*{wide}*{wide}"), &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::ParseFailure);
}

#[test]
fn test_result_above_address_space_is_parse_failure()
{
    let error = evaluate("ffffffffffffffff+1", &HashMap::new()).unwrap_err();
    assert_eq!(error, UserInputError::ParseFailure);
}
