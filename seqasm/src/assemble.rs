//! The two address-resolution passes and the per-mnemonic encoder.

use std::collections::HashMap;

use matches::debug_assert_matches;
use pest::iterators::Pair;

use crate::error::Error;
use crate::parser::Rule;
use crate::Result;
use seqvm::instructions::{self, Opcode, RegisterId};
use seqvm::{constants, Machine, Storage, Word};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Data,
    Text,
}

/// One assembly run's name tables. A fresh assembler is created per file;
/// nothing outlives the run.
pub struct Assembler<'i> {
    variables: HashMap<&'i str, Word>,
    functions: HashMap<&'i str, Word>,
    labels: HashMap<&'i str, Word>,
    entry: Option<Word>,
}

impl<'i> Assembler<'i> {
    pub fn new() -> Assembler<'i> {
        Assembler {
            variables: HashMap::new(),
            functions: HashMap::new(),
            labels: HashMap::new(),
            entry: None,
        }
    }

    pub fn assemble(mut self, program: Pair<'i, Rule>, machine: &mut Machine) -> Result<()> {
        debug_assert_matches!(program.as_rule(), Rule::program);
        let items: Vec<Pair<'i, Rule>> = program
            .into_inner()
            .filter(|pair| pair.as_rule() != Rule::EOI)
            .collect();

        self.scan(&items)?;
        self.emit(&items, machine)?;
        machine.set_pc(self.entry.unwrap_or(0));
        Ok(())
    }

    /// First pass: collect function addresses and jump labels. Every
    /// instruction line advances the cursor by the full 6-byte stride
    /// regardless of its true encoded length, so jump targets are known
    /// before any operand is encoded.
    fn scan(&mut self, items: &[Pair<'i, Rule>]) -> Result<()> {
        let mut section = Section::None;
        let mut cursor: Word = 0;

        for item in items {
            match item.as_rule() {
                Rule::directive => match directive_name(item) {
                    "text" => section = Section::Text,
                    "data" => section = Section::Data,
                    label => {
                        if section != Section::Text {
                            return Err(Error::BadSection {
                                line: line_of(item),
                                what: format!("label .{}", label),
                            });
                        }
                        self.labels.insert(label, cursor);
                    }
                },
                Rule::function_header => {
                    if section != Section::Text {
                        return Err(Error::BadSection {
                            line: line_of(item),
                            what: "function declaration".to_string(),
                        });
                    }
                    let (name, address) = function_parts(item)?;
                    self.functions.insert(name, address);
                    cursor = address;
                    if name == "main" {
                        self.entry = Some(address);
                    }
                }
                Rule::statement => {
                    if section == Section::Text {
                        cursor += constants::LONG_BYTES;
                    }
                }
                _ => unreachable!(),
            }
        }
        Ok(())
    }

    /// Second pass: define variables and encode instructions into memory.
    fn emit(&mut self, items: &[Pair<'i, Rule>], machine: &mut Machine) -> Result<()> {
        let mut section = Section::None;
        let mut cursor: Word = 0;

        for item in items {
            let line = line_of(item);
            match item.as_rule() {
                Rule::directive => match directive_name(item) {
                    "text" => section = Section::Text,
                    "data" => section = Section::Data,
                    _ => {}
                },
                Rule::function_header => {
                    let (_, address) = function_parts(item)?;
                    cursor = address;
                }
                Rule::statement => match section {
                    Section::Data => self.define_variable(item)?,
                    Section::Text => {
                        let raw = self.encode_statement(item)?;
                        let opcode = (raw & constants::OPCODE_MASK) as u8;
                        let length = instructions::encoded_length(opcode);
                        machine
                            .memory_mut()
                            .write(cursor, length, raw)
                            .map_err(|_| Error::OutOfMemory {
                                line,
                                address: cursor,
                            })?;
                        cursor += constants::LONG_BYTES;
                    }
                    Section::None => {
                        return Err(Error::BadSection {
                            line,
                            what: format!("instruction \"{}\"", item.as_str()),
                        });
                    }
                },
                _ => unreachable!(),
            }
        }
        Ok(())
    }

    fn define_variable(&mut self, item: &Pair<'i, Rule>) -> Result<()> {
        let line = line_of(item);
        let tokens: Vec<Pair<'i, Rule>> = item.clone().into_inner().collect();
        if tokens.len() != 2 {
            return Err(Error::BadLiteral {
                line,
                literal: item.as_str().to_string(),
            });
        }
        let value = parse_hex(tokens[1].as_str()).ok_or_else(|| Error::BadLiteral {
            line,
            literal: tokens[1].as_str().to_string(),
        })?;
        self.variables.insert(tokens[0].as_str(), value);
        Ok(())
    }

    fn encode_statement(&self, item: &Pair<'i, Rule>) -> Result<u64> {
        debug_assert_matches!(item.as_rule(), Rule::statement);
        let line = line_of(item);
        let tokens: Vec<Pair<'i, Rule>> = item.clone().into_inner().collect();
        let mnemonic = tokens[0].as_str();
        let operands = &tokens[1..];

        let bad_mnemonic = || Error::BadMnemonic {
            line,
            mnemonic: mnemonic.to_string(),
        };
        let opcode: Opcode = mnemonic.to_uppercase().parse().map_err(|_| bad_mnemonic())?;

        match opcode {
            Opcode::MOVRR | Opcode::ADDRR | Opcode::SUBRR => {
                let (a, b) = pair_of(operands).ok_or_else(bad_mnemonic)?;
                Ok(instructions::make_rr(
                    opcode,
                    self.register(a)?,
                    self.register(b)?,
                ))
            }
            Opcode::MOVRI
            | Opcode::ADDRI
            | Opcode::SUBRI
            | Opcode::MOVRM
            | Opcode::ADDRM
            | Opcode::SUBRM => {
                let (a, b) = pair_of(operands).ok_or_else(bad_mnemonic)?;
                Ok(instructions::make_ri(
                    opcode,
                    self.register(a)?,
                    i64::from(self.immediate(b)?),
                ))
            }
            Opcode::MOVMR | Opcode::ADDMR | Opcode::SUBMR => {
                let (a, b) = pair_of(operands).ok_or_else(bad_mnemonic)?;
                Ok(instructions::make_mr(
                    opcode,
                    self.immediate(a)?,
                    self.register(b)?,
                ))
            }
            Opcode::CALL => {
                let target = single_of(operands).ok_or_else(bad_mnemonic)?;
                Ok(instructions::make_jump(opcode, self.call_target(target)?))
            }
            Opcode::PUSH | Opcode::POP => {
                let operand = single_of(operands).ok_or_else(bad_mnemonic)?;
                Ok(instructions::make_stack(opcode, self.register(operand)?))
            }
            Opcode::RET | Opcode::HALT | Opcode::PASS => {
                if !operands.is_empty() {
                    return Err(bad_mnemonic());
                }
                Ok(instructions::make_plain(opcode))
            }
            _ => {
                // All jumps take a single label operand.
                let target = single_of(operands).ok_or_else(bad_mnemonic)?;
                Ok(instructions::make_jump(opcode, self.label(target)?))
            }
        }
    }

    fn register(&self, pair: &Pair<'i, Rule>) -> Result<RegisterId> {
        pair.as_str()
            .to_uppercase()
            .parse()
            .map_err(|_| Error::BadRegister {
                line: line_of(pair),
                name: pair.as_str().to_string(),
            })
    }

    /// Immediate position: a data variable, else a hex literal.
    fn immediate(&self, pair: &Pair<'i, Rule>) -> Result<Word> {
        let text = pair.as_str();
        if let Some(&value) = self.variables.get(text) {
            return Ok(value);
        }
        parse_hex(text).ok_or_else(|| Error::BadLiteral {
            line: line_of(pair),
            literal: text.to_string(),
        })
    }

    fn label(&self, pair: &Pair<'i, Rule>) -> Result<Word> {
        let text = pair.as_str().trim_start_matches('.');
        self.labels
            .get(text)
            .copied()
            .ok_or_else(|| Error::BadLabel {
                line: line_of(pair),
                label: pair.as_str().to_string(),
            })
    }

    /// Call target: a declared function, else a hex address.
    fn call_target(&self, pair: &Pair<'i, Rule>) -> Result<Word> {
        let text = pair.as_str();
        if let Some(&address) = self.functions.get(text) {
            return Ok(address);
        }
        parse_hex(text).ok_or_else(|| Error::BadLabel {
            line: line_of(pair),
            label: text.to_string(),
        })
    }
}

fn pair_of<'a, 'i>(
    operands: &'a [Pair<'i, Rule>],
) -> Option<(&'a Pair<'i, Rule>, &'a Pair<'i, Rule>)> {
    match operands {
        [a, b] => Some((a, b)),
        _ => None,
    }
}

fn single_of<'a, 'i>(operands: &'a [Pair<'i, Rule>]) -> Option<&'a Pair<'i, Rule>> {
    match operands {
        [a] => Some(a),
        _ => None,
    }
}

fn directive_name<'i>(item: &Pair<'i, Rule>) -> &'i str {
    item.clone().into_inner().next().unwrap().as_str()
}

fn function_parts<'i>(item: &Pair<'i, Rule>) -> Result<(&'i str, Word)> {
    let mut inner = item.clone().into_inner();
    let name = inner.next().unwrap();
    let literal = inner.next().unwrap();
    let address = parse_hex(literal.as_str()).ok_or_else(|| Error::BadLiteral {
        line: line_of(item),
        literal: literal.as_str().to_string(),
    })?;
    Ok((name.as_str(), address))
}

fn parse_hex(text: &str) -> Option<Word> {
    let digits = if text.starts_with("0x") || text.starts_with("0X") {
        &text[2..]
    } else {
        text
    };
    Word::from_str_radix(digits, 16).ok()
}

fn line_of(pair: &Pair<Rule>) -> usize {
    pair.as_span().start_pos().line_col().0
}
