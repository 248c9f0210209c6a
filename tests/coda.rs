use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use libcoda::{Coda, CodaError, Encoding, Node, Statement, TransactionCode};

fn fixture() -> String {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/statement.cod");
    std::fs::read_to_string(path).unwrap()
}

fn statement() -> Statement {
    let mut coda = Coda::parse_str(&fixture()).unwrap();
    assert_eq!(coda.statements.len(), 1);
    coda.statements.remove(0)
}

fn amount(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Parses the fixture after overwriting line `index` from character `start` with `text`.
fn parse_patched(index: usize, start: usize, text: &str) -> libcoda::Result<Coda> {
    let input = fixture();
    let mut lines: Vec<String> = input.lines().map(str::to_string).collect();
    let mut chars: Vec<char> = lines[index].chars().collect();
    for (i, c) in text.chars().enumerate() {
        chars[start + i] = c;
    }
    lines[index] = chars.into_iter().collect();
    Coda::parse_str(&lines.join("\n"))
}

const CLOSING_BALANCE: usize = 19;
const TRAILER: usize = 20;

#[test]
fn decodes_header() {
    let statement = statement();
    assert_eq!(statement.creation_date, Some(date(2006, 12, 6)));
    assert_eq!(statement.bank_id, Some(725));
    assert_eq!(statement.duplicate, Some(false));
    assert_eq!(statement.file_reference.as_deref(), Some("00099449"));
    assert_eq!(statement.address.as_deref(), Some("Testgebruiker21"));
    assert_eq!(statement.bic.as_deref(), Some("KREDBEBB"));
    assert_eq!(statement.company_id.as_deref(), Some("00630366277"));
    assert_eq!(statement.reference.as_deref(), Some("REF-0001"));
    assert_eq!(statement.related_reference.as_deref(), Some("RELREF-01"));
    assert_eq!(statement.version, Some(2));
}

#[test]
fn decodes_balances_and_trailer() {
    let statement = statement();
    assert_eq!(statement.account_structure.as_deref(), Some("0"));
    assert_eq!(statement.old_sequence.as_deref(), Some("001"));
    assert_eq!(statement.new_sequence.as_deref(), Some("001"));
    assert_eq!(statement.account(), Some("435000000080"));
    assert_eq!(statement.account_currency(), Some("EUR"));
    assert_eq!(statement.account_country(), Some("BE"));
    assert_eq!(statement.opening_balance, Some(amount("0")));
    assert_eq!(statement.opening_balance_date, Some(date(2006, 12, 6)));
    assert_eq!(statement.account_holder_name.as_deref(), Some("Testgebruiker21"));
    assert_eq!(statement.account_description.as_deref(), Some("KBC-Bedrijfsrekening"));
    assert_eq!(statement.coda_sequence.as_deref(), Some("001"));
    assert_eq!(statement.closing_balance, Some(amount("2971.5")));
    assert_eq!(statement.closing_balance_date, Some(date(2006, 12, 7)));
    assert_eq!(statement.number_records, Some(19));
    assert_eq!(statement.total_debit, Some(amount("2729")));
    assert_eq!(statement.total_credit, Some(amount("5700.5")));
    assert_eq!(statement.to_string(), "001");
}

#[test]
fn balance_identity_holds() {
    let statement = statement();
    let opening = statement.opening_balance.unwrap();
    let closing = statement.closing_balance.unwrap();
    assert_eq!(
        closing - opening,
        statement.total_credit.unwrap() - statement.total_debit.unwrap()
    );

    let net: Decimal = statement.moves.iter().filter_map(|m| m.amount).sum();
    assert_eq!(net, closing - opening);
}

#[test]
fn decodes_moves() {
    let statement = statement();
    let sequences: Vec<&str> = statement.moves.iter().map(Node::sequence).collect();
    assert_eq!(sequences, vec!["0001", "0002", "0003", "0004", "0005"]);

    let first = statement.find_move("0001", "0000").unwrap();
    assert_eq!(first.bank_reference.as_deref(), Some("EPIB00048 AWIUBTKAPUO"));
    assert_eq!(first.amount, Some(amount("-2578.25")));
    assert_eq!(first.value_date, Some(date(2006, 12, 6)));
    assert_eq!(first.entry_date, Some(date(2006, 12, 6)));
    assert_eq!(first.transaction_code.as_deref(), Some("00799000"));
    assert_eq!(first.transaction_family(), Some("07"));
    assert_eq!(first.statement_number.as_deref(), Some("001"));
    assert_eq!(
        first.communication(),
        Some("BORDEREAU DE DECOMPTE AVANCES    015")
    );
    assert!(first.moves.is_empty());
}

#[test]
fn joins_articles_of_one_move() {
    let statement = statement();
    let payment = statement.find_move("0003", "0000").unwrap();
    assert_eq!(payment.amount, Some(amount("4200.5")));
    assert_eq!(payment.customer_reference.as_deref(), Some("NB2206092900135"));
    assert_eq!(payment.counterparty_bic.as_deref(), Some("CREGBEBB"));
    assert_eq!(
        payment.counterparty_account.as_deref(),
        Some("LU037050522702273100")
    );
    assert_eq!(
        payment.counterparty_name.as_deref().map(str::trim),
        Some("Olgerdin Egill Skallagrims")
    );

    let communication = payment.communication().unwrap();
    assert!(communication.starts_with("PAYMENT FOR INVOICE 2006/1234 AND"));
    assert!(communication.ends_with("INVOICE 2006/1235"));
}

#[test]
fn details_sum_to_their_move() {
    let statement = statement();
    for sequence in &["0002", "0005"] {
        let parent = statement.find_move(sequence, "0000").unwrap();
        assert!(!parent.moves.is_empty());
        let sum: Decimal = parent.moves.iter().filter_map(|m| m.amount).sum();
        assert_eq!(Some(sum), parent.amount);
    }
}

#[test]
fn finds_moves_at_every_depth() {
    let statement = statement();
    let detail = statement.find_move("0002", "0001").unwrap();
    assert_eq!(detail.amount, Some(amount("1000")));
    assert_eq!(detail.transaction_type(), Some("5"));

    let sub_detail = statement.find_move("0002", "0003").unwrap();
    assert_eq!(sub_detail.transaction_type(), Some("9"));
    assert_eq!(sub_detail.communication(), Some("SUB DETAIL"));
    let parent = statement.find_move("0002", "0002").unwrap();
    assert_eq!(parent.moves.len(), 1);

    assert!(statement.find_move("0002", "0009").is_none());
    assert!(statement.find_move("0009", "0000").is_none());

    let order: Vec<String> = statement.all_moves().map(|m| m.to_string()).collect();
    assert_eq!(
        order,
        vec![
            "00010000", "00020000", "00020001", "00020002", "00020003", "00030000", "00040000",
            "00050000", "00050001",
        ]
    );
}

#[test]
fn structured_communications() {
    let statement = statement();
    let structured = statement.find_move("0004", "0000").unwrap();
    assert_eq!(structured.communication_type(), Some("101"));
    assert_eq!(structured.communication(), Some("269021157996"));

    let card = statement.find_move("0005", "0001").unwrap();
    assert_eq!(card.communication_type(), Some("106"));
    assert_eq!(card.communication(), None);
}

#[test]
fn decodes_informations() {
    let statement = statement();
    assert_eq!(statement.informations.len(), 2);
    let payment = &statement.informations["OL9456574JBBNEUBCRCL1"];
    assert_eq!(payment.len(), 2);

    let identification = statement.find_information("0003", "0001").unwrap();
    assert_eq!(identification.transaction_code.as_deref(), Some("34150000"));
    assert_eq!(identification.communication_type(), Some("001"));
    assert_eq!(identification.name().unwrap(), "Olgerdin Egill Skallagrims");
    assert_eq!(identification.street().unwrap(), "Grjothalsi 7");
    assert_eq!(identification.locality().unwrap(), "11110 Reykjavik");
    assert!(identification.coin().unwrap_err().is_not_applicable());

    let banker = statement.find_information("0003", "0002").unwrap();
    assert_eq!(banker.counterparty_banker().unwrap(), "SOCIETE GENERALE");

    let coins = statement.find_information("0005", "0002").unwrap();
    assert_eq!(coins.coin_number().unwrap(), 1);
    assert_eq!(coins.coin().unwrap(), amount("10"));
    assert_eq!(coins.total_amount().unwrap(), amount("10"));

    assert!(statement.find_information("0001", "0000").is_none());
}

#[test]
fn joins_three_information_articles() {
    let statement = statement();
    let identification = statement.find_information("0003", "0001").unwrap();
    let raw = identification.raw_communication.as_deref().unwrap();
    assert_eq!(raw.chars().count(), 74 + 105 + 90);
    assert_eq!(raw[179..].trim_end(), "ARTICLE THREE TEXT");
    assert_eq!(identification.code_id().unwrap(), "");
}

#[test]
fn informations_keep_file_order() {
    let statement = statement();
    let keys: Vec<&str> = statement.informations.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["OL9456574JBBNEUBCRCL1", "CARD000050000000000CC"]);

    let order: Vec<String> = statement.all_informations().map(|i| i.to_string()).collect();
    assert_eq!(order, vec!["00030001", "00030002", "00050002"]);
}

#[test]
fn decodes_free_communications() {
    let statement = statement();
    assert_eq!(statement.free_communications.len(), 1);
    let communication = &statement.free_communications[0];
    assert_eq!(communication.sequence.as_deref(), Some("0001"));
    assert_eq!(
        communication.text.as_deref(),
        Some("THANK YOU FOR BANKING WITH US")
    );
}

#[test]
fn decoding_is_deterministic() {
    let input = fixture();
    assert_eq!(Coda::parse_str(&input).unwrap(), Coda::parse_str(&input).unwrap());
}

#[test]
fn reader_and_str_agree() {
    let input = fixture();
    let from_reader = Coda::from_reader(std::io::Cursor::new(input.clone())).unwrap();
    assert_eq!(from_reader, Coda::parse_str(&input).unwrap());
}

#[test]
fn repeated_statements() {
    let input = fixture();
    let twice = format!("{}\r\n{}", input.trim_end(), input);
    let coda = Coda::parse_str(&twice).unwrap();
    assert_eq!(coda.statements.len(), 2);
    assert_eq!(coda.statements[0], coda.statements[1]);
}

#[test]
fn rejects_wrong_total_credit() {
    match parse_patched(TRAILER, 37, "000000005700600") {
        Err(CodaError::CreditMismatch { declared, computed }) => {
            assert_eq!(declared, amount("5700.6"));
            assert_eq!(computed, amount("5700.5"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn rejects_shifted_totals() {
    let input = fixture();
    let mut lines: Vec<&str> = input.lines().collect();
    let trailer = lines[TRAILER]
        .replace("000000002729000", "000000002729100")
        .replace("000000005700500", "000000005700600");
    lines[TRAILER] = &trailer;
    assert!(matches!(
        Coda::parse_str(&lines.join("\n")),
        Err(CodaError::CreditMismatch { .. })
    ));
}

#[test]
fn rejects_wrong_total_debit() {
    assert!(matches!(
        parse_patched(TRAILER, 22, "000000002729100"),
        Err(CodaError::DebitMismatch { .. })
    ));
}

#[test]
fn rejects_wrong_record_count() {
    match parse_patched(TRAILER, 16, "000020") {
        Err(CodaError::RecordCountMismatch { declared, counted }) => {
            assert_eq!(declared, 20);
            assert_eq!(counted, 19);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn rejects_wrong_closing_balance() {
    assert!(matches!(
        parse_patched(CLOSING_BALANCE, 41, "0000000002971600"),
        Err(CodaError::BalanceMismatch { .. })
    ));
}

#[test]
fn rejects_malformed_total() {
    assert!(matches!(
        parse_patched(TRAILER, 37, "00000000570X500"),
        Err(CodaError::Format { field: "total_credit", .. })
    ));
}

#[test]
fn rejects_unsupported_version() {
    assert!(matches!(
        parse_patched(0, 127, "1"),
        Err(CodaError::UnsupportedVersion(ref v)) if v == "1"
    ));
}

#[test]
fn rejects_missing_trailer() {
    let input = fixture();
    let truncated: Vec<&str> = input.lines().take(TRAILER).collect();
    assert!(matches!(
        Coda::parse_str(&truncated.join("\n")),
        Err(CodaError::Structural(_))
    ));
}

#[test]
fn rejects_detail_of_another_move() {
    assert!(matches!(
        parse_patched(4, 2, "0009"),
        Err(CodaError::Structural(_))
    ));
}

#[test]
fn rejects_unknown_transaction_type() {
    assert!(matches!(
        parse_patched(2, 53, "4"),
        Err(CodaError::Structural(_))
    ));
}

#[test]
fn rejects_inconsistent_continuation() {
    match parse_patched(8, 2, "0004") {
        Err(CodaError::Inconsistent { field, stored, found }) => {
            assert_eq!(field, "sequence");
            assert_eq!(stored, "0003");
            assert_eq!(found, "0004");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn serializes_to_json() {
    let coda = Coda::parse_str(&fixture()).unwrap();
    let json = serde_json::to_value(&coda).unwrap();
    let statement = &json["statements"][0];
    assert_eq!(statement["bank_id"], 725);
    assert_eq!(statement["creation_date"], "2006-12-06");
    assert_eq!(statement["moves"][1]["moves"][1]["moves"][0]["detail_sequence"], "0003");

    let back: Coda = serde_json::from_value(json).unwrap();
    assert_eq!(back, coda);
}

#[test]
fn decodes_windows_1252_bytes() {
    let input = fixture();
    let mut lines: Vec<String> = input.lines().map(str::to_string).collect();
    lines[18] = lines[18].replace("THANK YOU", "MERCI    ");
    let mut bytes = lines.join("\n").into_bytes();
    let position = bytes.windows(5).position(|w| w == b"MERCI").unwrap();
    bytes[position + 6] = 0xE9;

    let coda = Coda::from_bytes(&bytes, Encoding::Windows1252).unwrap();
    let text = coda.statements[0].free_communications[0].text.clone().unwrap();
    assert!(text.starts_with("MERCI \u{e9}"));

    assert!(matches!(
        Coda::from_bytes(&bytes, Encoding::Utf8),
        Err(CodaError::Encoding(_))
    ));
}
