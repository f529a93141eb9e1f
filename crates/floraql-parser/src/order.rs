//! Sort specifications: `name:asc,instrument.id:desc`

use floraql_ast::{AttributePath, Direction, OrderSpec};
use floraql_diagnostics::{FQL0203, QueryError, Result};

fn invalid(message: impl Into<String>) -> QueryError {
    QueryError::validation(FQL0203, message)
}

/// Parse a comma separated list of `attribute:direction` entries
pub fn parse_order(input: &str) -> Result<Vec<OrderSpec>> {
    let components: Vec<&str> = input.split(',').collect();
    if components.iter().any(|c| c.is_empty()) {
        return Err(invalid("order cannot be empty"));
    }

    let specs = components
        .into_iter()
        .map(parse_component)
        .collect::<Result<Vec<_>>>()?;

    if specs.len() > 1 && specs.iter().any(|s| s.direction == Direction::Random) {
        return Err(invalid("random order cannot be combined with other order entries"));
    }
    Ok(specs)
}

fn parse_component(component: &str) -> Result<OrderSpec> {
    let mut parts = component.split(':');
    let (attribute, direction) = match (parts.next(), parts.next(), parts.next()) {
        (Some(attribute), Some(direction), None) => (attribute, direction),
        (_, None, _) => {
            return Err(invalid(format!(
                "Invalid order parameter (missing direction): {component}"
            )));
        }
        _ => return Err(invalid(format!("Invalid order parameter: {component}"))),
    };

    if attribute.is_empty() {
        return Err(invalid("No attribute set to order"));
    }
    let attribute: AttributePath = attribute.split('.').map(str::to_string).collect();
    if attribute.iter().any(String::is_empty) {
        return Err(invalid(format!("Invalid order attribute: {component}")));
    }

    let direction = direction
        .parse::<Direction>()
        .map_err(|()| invalid(format!("Invalid order direction: {component}")))?;

    Ok(OrderSpec { attribute, direction })
}

#[cfg(test)]
mod tests {
    use super::*;
    use floraql_ast::path;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_single_and_nested() {
        assert_eq!(
            parse_order("instrument.id:asc,name:desc").unwrap(),
            vec![
                OrderSpec {
                    attribute: path(&["instrument", "id"]),
                    direction: Direction::Asc,
                },
                OrderSpec {
                    attribute: path(&["name"]),
                    direction: Direction::Desc,
                },
            ]
        );
    }

    #[test]
    fn test_random_alone() {
        let specs = parse_order("name:random").unwrap();
        assert_eq!(specs[0].direction, Direction::Random);
    }

    #[rstest]
    #[case("", "order cannot be empty")]
    #[case(",", "order cannot be empty")]
    #[case("name:asc,", "order cannot be empty")]
    #[case("foo", "Invalid order parameter (missing direction): foo")]
    #[case("name:asc,type", "Invalid order parameter (missing direction): type")]
    #[case("name:asc:foo", "Invalid order parameter: name:asc:foo")]
    #[case("name:as", "Invalid order direction: name:as")]
    #[case("name:ASC", "Invalid order direction: name:ASC")]
    #[case(":random", "No attribute set to order")]
    #[case("name:asc,:random", "No attribute set to order")]
    #[case("a..b:asc", "Invalid order attribute: a..b:asc")]
    #[case("name:asc,id:random", "random order cannot be combined with other order entries")]
    fn test_invalid(#[case] input: &str, #[case] message: &str) {
        let err = parse_order(input).unwrap_err();
        assert_eq!(err.code(), FQL0203);
        assert_eq!(err.to_string(), message);
    }
}
