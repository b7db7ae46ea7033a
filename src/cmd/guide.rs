use crate::domain::step::WorkflowStep;

pub fn render() -> String {
    let mut out = String::from("Ticket handoff workflow\n");
    for step in WorkflowStep::ALL {
        out.push_str(&format!("\n{}. {}\n", step.number(), step.title()));
        for line in step.instructions() {
            out.push_str(&format!("   - {line}\n"));
        }
    }
    out
}

pub fn run() {
    print!("{}", render());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_step_in_order() {
        let guide = render();

        let branch = guide.find("3. Create a branch").unwrap();
        let verify = guide.find("5. Verify").unwrap();
        let docs = guide.find("8. Update docs").unwrap();
        assert!(branch < verify && verify < docs);
        assert!(guide.contains("handoff start"));
    }
}
