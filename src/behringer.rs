//! Behringer headers.

use lazy_static::lazy_static;

use crate::dispatch::Rule;
use crate::template;

lazy_static! {
    pub static ref RULES: Vec<Rule> = vec![
        Rule::Header {
            template: template![0xf0, 0x00, 0x20, 0x32, 0x00, 0x01, 0x24, 0x00],
            length: None,
            device: "Pro-800",
            label: None,
        },
    ];
}

#[cfg(test)]
mod tests {
    use crate::dispatch::parse;

    #[test]
    fn pro_800() {
        let data = [0xf0, 0x00, 0x20, 0x32, 0x00, 0x01, 0x24, 0x00, 0x6f, 0x01, 0xf7];
        let message = parse(&data, None).unwrap();
        assert_eq!(message.manufacturer_name(), Some("Behringer"));
        assert_eq!(message.device(), Some("Pro-800"));
        assert_eq!(message.type_name(), None);
        assert_eq!(message.manufacturer_id(), vec![0x00, 0x20, 0x32]);
    }
}
