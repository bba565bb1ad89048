/*!
Edge list EBNF
--------------

```ebnf
program = SP, { statement, SP } ;
statement = label, [ SP, "--", SP, label ] ;
label = label_char, { label_char } ;
label_char = letter | digit | "_" | "." | ":" ;
comment = "#", { ? any character except newline ? } ;
letter = ? a-zA-Z ? ;
digit = ? 0-9 ? ;
SP = { whitespace | comment } ;
```

A statement with two labels is an edge; a lone label declares an isolated node. Repeating an edge
adds a parallel edge.
*/

use crate::network::Network;
use chumsky::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Node(String),
    Edge(String, String),
}

fn label() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_alphanumeric() || matches!(*c, '_' | '.' | ':'))
        .repeated()
        .at_least(1)
        .collect::<String>()
}

fn blank() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    let comment = just('#')
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored();

    filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(comment)
        .repeated()
        .ignored()
}

pub fn statement() -> impl Parser<char, Statement, Error = Simple<char>> + Clone {
    label()
        .then(
            just("--")
                .padded_by(blank())
                .ignore_then(label())
                .or_not(),
        )
        .map(|(source, target)| match target {
            Some(target) => Statement::Edge(source, target),
            None => Statement::Node(source),
        })
}

pub fn parser() -> impl Parser<char, Vec<Statement>, Error = Simple<char>> {
    blank()
        .ignore_then(statement().then_ignore(blank()).repeated())
        .then_ignore(end())
}

pub fn build_network(statements: Vec<Statement>) -> Network<String> {
    let mut network = Network::new();

    for statement in statements {
        match statement {
            Statement::Node(label) => {
                network.add_node(label);
            }
            Statement::Edge(source, target) => {
                network.add_edge(source, target);
            }
        }
    }

    network
}
