//! Integration test suite for the MiniJava compiler
//!
//! This crate provides integration tests that verify components work
//! together correctly across component boundaries.

use bytecode_system::{BytecodeChunk, Opcode};
use core_types::CompileError;
use parser::{
    BytecodeGenerator, GeneratedCode, Parser, Program, ScopeAnalyzer, SequentialLayout,
    SymbolTable,
};

/// Re-export components for test convenience
pub mod components {
    pub use bytecode_system;
    pub use core_types;
    pub use mjc_cli;
    pub use parser;
}

/// Every artifact of one successful compilation
pub struct Pipeline {
    /// Parsed program
    pub program: Program,
    /// Resolved names
    pub table: SymbolTable,
    /// Generated code
    pub code: GeneratedCode,
}

/// Run parsing, resolution, layout and generation over `source`
pub fn compile(source: &str) -> Result<Pipeline, CompileError> {
    let program = Parser::new(source).parse()?;
    let table = ScopeAnalyzer::new().analyze(&program)?;
    let environment = SequentialLayout::build(&table);
    let code = BytecodeGenerator::new(&table, &environment).generate(&program)?;
    Ok(Pipeline {
        program,
        table,
        code,
    })
}

/// Check the structural invariants every generated chunk must satisfy:
/// all labels bound inside the chunk, and the last instruction returns.
pub fn assert_well_formed(name: &str, chunk: &BytecodeChunk) {
    assert!(
        chunk.unmarked_labels().is_empty(),
        "{}: unbound labels {:?}",
        name,
        chunk.unmarked_labels()
    );
    for opcode in chunk.opcodes() {
        if let Some(label) = opcode.branch_target() {
            let target = chunk.label_target(label).expect("bound label");
            assert!(
                target < chunk.instruction_count(),
                "{}: {} branches past the end",
                name,
                opcode
            );
        }
    }
    assert_eq!(
        chunk.last_opcode(),
        Some(&Opcode::Return),
        "{}: must end with a return",
        name
    );
}

/// Sample programs shared by the integration tests
pub mod programs {
    /// Recursive factorial
    pub const FACTORIAL: &str = "
class Factorial {
    public static void main() {
        System.out.println(new Fac().compute(10));
    }
}

class Fac {
    public int compute(int num) {
        int result;
        if (num < 1)
            result = 1;
        else
            result = num * (this.compute(num - 1));
        return result;
    }
}
";

    /// Array sorting with nested loops and fields
    pub const BUBBLE_SORT: &str = "
class BubbleSort {
    public static void main() {
        System.out.println(new BBS().start(10));
    }
}

class BBS {
    int[] number;
    int size;

    public int start(int sz) {
        int aux01;
        aux01 = this.init(sz);
        aux01 = this.sort();
        aux01 = this.print();
        return 0;
    }

    public int sort() {
        int i;
        int j;
        int t;
        i = size - 1;
        while (0 < i) {
            j = 1;
            while (j < i + 1) {
                if (number[j] < number[j - 1]) {
                    t = number[j - 1];
                    number[j - 1] = number[j];
                    number[j] = t;
                } else { }
                j = j + 1;
            }
            i = i - 1;
        }
        return 0;
    }

    public int print() {
        int j;
        j = 0;
        while (j < size) {
            System.out.println(number[j]);
            j = j + 1;
        }
        return 0;
    }

    public int init(int sz) {
        size = sz;
        number = new int[sz];
        number[0] = 20;
        number[1] = 7;
        number[2] = 12;
        return 0;
    }
}
";

    /// Inheritance, overriding, boolean logic and assertions
    pub const SHAPES: &str = "
class Shapes {
    public static void main() {
        Shape s;
        Square q;
        q = new Square();
        assert(q.setSide(3) == 9);
        s = q;
        System.out.println(s.area());
        assert(!(s.area() < 0) && true || false);
    }
}

class Shape {
    int cachedArea;
    boolean valid;
    public int area() { return cachedArea; }
    public boolean isValid() { return valid; }
}

class Square extends Shape {
    int side;
    public int setSide(int len) {
        side = len;
        cachedArea = side * side;
        valid = true;
        return this.area();
    }
    public int area() {
        if (this.isValid()) { } else { cachedArea = 0; }
        return cachedArea;
    }
}
";
}
